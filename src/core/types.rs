//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for objects and agents registered in a world.
///
/// Assigned sequentially by the world on registration, stable for the
/// object's lifetime in that world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Simulation tick counter (simulation time unit)
pub type Tick = u64;

/// 2D position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Normalize an angle in degrees into [0, 360).
///
/// Non-finite inputs normalize to 0.0.
pub fn normalize_angle(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Degrees to radians conversion factor
pub const DEG2RAD: f32 = std::f32::consts::PI / 180.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_ordering() {
        assert!(ObjectId(1) < ObjectId(2));
        assert_eq!(ObjectId(7), ObjectId(7));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_normalize_zero() {
        let v = Vec2::default();
        assert_eq!(v.normalize(), Vec2::default());
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(370.0) - 10.0).abs() < 1e-6);
        assert!((normalize_angle(-10.0) - 350.0).abs() < 1e-6);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
    }

    #[test]
    fn test_normalize_angle_range() {
        for deg in [-725.0_f32, -1.0, -1.0e-7, 0.0, 45.0, 359.9, 360.0, 1080.5] {
            let n = normalize_angle(deg);
            assert!((0.0..360.0).contains(&n), "angle {} normalized to {}", deg, n);
        }
    }

    #[test]
    fn test_normalize_angle_large_magnitude() {
        // Inputs where repeated subtraction of 360.0 would not make progress
        for deg in [1.0e10_f32, -1.0e10, 3.6e18, f32::MAX, f32::MIN] {
            let n = normalize_angle(deg);
            assert!((0.0..360.0).contains(&n), "angle {} normalized to {}", deg, n);
        }
    }

    #[test]
    fn test_normalize_angle_non_finite() {
        assert_eq!(normalize_angle(f32::NAN), 0.0);
        assert_eq!(normalize_angle(f32::INFINITY), 0.0);
        assert_eq!(normalize_angle(f32::NEG_INFINITY), 0.0);
    }
}
