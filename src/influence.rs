//! Influence maps - scalar sensory fields (light, sound, scent)
//!
//! Behaviours sample these fields instead of ray-casting at other objects.
//! Each map is a set of circular emitters with linear falloff; values at a
//! point are additive across emitters.

use crate::core::types::Vec2;

/// A circular influence emitter with linear falloff
#[derive(Debug, Clone)]
pub struct CircularInfluence {
    pub position: Vec2,
    pub strength: f32,
    pub radius: f32,
    degrade: f32,
    limit: f32,
}

impl CircularInfluence {
    /// A static emitter that never fades
    pub fn fixed(position: Vec2, strength: f32, radius: f32) -> Self {
        Self {
            position,
            strength,
            radius,
            degrade: 0.0,
            limit: 0.0,
        }
    }

    /// An emitter that loses `degrade` strength per second and disappears
    /// once it falls below a small cutoff
    pub fn fading(position: Vec2, strength: f32, radius: f32, degrade: f32) -> Self {
        Self {
            position,
            strength,
            radius,
            degrade,
            limit: 0.001,
        }
    }

    /// Field value at a point: strength minus linear falloff with distance,
    /// clamped at zero outside the radius
    pub fn value_at(&self, at: Vec2) -> f32 {
        let dist = self.position.distance(&at);
        (self.strength - self.strength / self.radius * dist).max(0.0)
    }

    fn step(&mut self, dt: f32) {
        if self.degrade > 0.0 && self.strength > 0.0 {
            self.strength -= self.degrade * dt;
            if self.strength < self.limit {
                self.strength = 0.0;
            }
        }
    }

    fn exhausted(&self) -> bool {
        self.degrade > 0.0 && self.strength <= 0.0
    }
}

/// A named layer of influence emitters owned by the world
#[derive(Debug, Clone, Default)]
pub struct InfluenceMap {
    sources: Vec<CircularInfluence>,
}

impl InfluenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: CircularInfluence) {
        self.sources.push(source);
    }

    /// Sum of all emitter contributions at a point
    pub fn sample(&self, at: Vec2) -> f32 {
        self.sources.iter().map(|s| s.value_at(at)).sum()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Advance fading emitters and drop the exhausted ones. Called by the
    /// world once per tick, after agent updates.
    pub(crate) fn step(&mut self, dt: f32) {
        for source in &mut self.sources {
            source.step(dt);
        }
        self.sources.retain(|s| !s.exhausted());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_falloff() {
        let src = CircularInfluence::fixed(Vec2::new(0.0, 0.0), 1.0, 100.0);
        assert!((src.value_at(Vec2::new(0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((src.value_at(Vec2::new(50.0, 0.0)) - 0.5).abs() < 1e-6);
        assert_eq!(src.value_at(Vec2::new(150.0, 0.0)), 0.0);
    }

    #[test]
    fn test_sample_is_additive() {
        let mut map = InfluenceMap::new();
        map.add(CircularInfluence::fixed(Vec2::new(0.0, 0.0), 1.0, 100.0));
        map.add(CircularInfluence::fixed(Vec2::new(100.0, 0.0), 1.0, 100.0));
        let mid = map.sample(Vec2::new(50.0, 0.0));
        assert!((mid - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fading_source_is_dropped_when_exhausted() {
        let mut map = InfluenceMap::new();
        map.add(CircularInfluence::fading(Vec2::new(0.0, 0.0), 1.0, 50.0, 0.5));
        map.step(1.0);
        assert_eq!(map.len(), 1);
        assert!(map.sample(Vec2::new(0.0, 0.0)) < 1.0);
        map.step(1.0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_fixed_source_never_fades() {
        let mut map = InfluenceMap::new();
        map.add(CircularInfluence::fixed(Vec2::new(0.0, 0.0), 1.0, 50.0));
        for _ in 0..100 {
            map.step(1.0);
        }
        assert_eq!(map.len(), 1);
        assert!((map.sample(Vec2::new(0.0, 0.0)) - 1.0).abs() < 1e-6);
    }
}
