//! Objects - positioned, oriented entities in the world

use serde::{Deserialize, Serialize};

use crate::core::types::{normalize_angle, ObjectId, Vec2, DEG2RAD};

/// A generic object in the world: the base unit of identity and spatial state.
///
/// Objects are created standalone and registered into a world, which assigns
/// their id. Position and heading mutators are unrestricted; the core performs
/// no bounds checking (world-bounds policies belong to the surrounding
/// application).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    /// `Some` while registered in a world. Skipped on serialization so a
    /// deserialized object starts out unregistered.
    #[serde(skip)]
    id: Option<ObjectId>,
    pub position: Vec2,
    heading: f32,
    /// Optional group/tag for classification and bulk queries
    pub tag: Option<String>,
    /// Optional kinematic state integrated by the per-tick hook
    pub kinematics: Option<Kinematics>,
}

/// Linear and angular velocity for objects that move on their own.
///
/// Velocity is applied along the object's current heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Units per second along the heading
    pub velocity: f32,
    /// Degrees per second
    pub angular_velocity: f32,
}

impl Object {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            id: None,
            position: Vec2::new(x, y),
            heading: normalize_angle(heading),
            tag: None,
            kinematics: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_kinematics(mut self, kinematics: Kinematics) -> Self {
        self.kinematics = Some(kinematics);
        self
    }

    /// The world-assigned id, if registered
    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Heading angle in degrees, always in [0, 360)
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn set_heading(&mut self, degrees: f32) {
        self.heading = normalize_angle(degrees);
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.position.x += tx;
        self.position.y += ty;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.heading = normalize_angle(self.heading + degrees);
    }

    /// Set linear velocity, creating the kinematic state if absent
    pub fn set_velocity(&mut self, velocity: f32) {
        self.kinematics.get_or_insert_with(Kinematics::default).velocity = velocity;
    }

    /// Set angular velocity in degrees per second
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        self.kinematics
            .get_or_insert_with(Kinematics::default)
            .angular_velocity = angular_velocity;
    }

    /// Per-tick hook: integrate kinematics over `dt` seconds.
    ///
    /// Rotation is applied before translation, so the velocity acts along
    /// the new heading.
    pub fn step(&mut self, dt: f32) {
        let Some(kinematics) = self.kinematics else {
            return;
        };
        if kinematics.angular_velocity != 0.0 {
            self.rotate(kinematics.angular_velocity * dt);
        }
        if kinematics.velocity != 0.0 {
            let rad = self.heading * DEG2RAD;
            self.position.x += kinematics.velocity * rad.cos() * dt;
            self.position.y += kinematics.velocity * rad.sin() * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_object_is_unregistered() {
        let obj = Object::new(1.0, 2.0, 90.0);
        assert!(obj.id().is_none());
        assert_eq!(obj.position, Vec2::new(1.0, 2.0));
        assert_eq!(obj.heading(), 90.0);
    }

    #[test]
    fn test_heading_normalized_on_construction() {
        let obj = Object::new(0.0, 0.0, 450.0);
        assert!((obj.heading() - 90.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut obj = Object::new(0.0, 0.0, 350.0);
        obj.rotate(20.0);
        assert!((obj.heading() - 10.0).abs() < 1e-5);
        obj.rotate(-20.0);
        assert!((obj.heading() - 350.0).abs() < 1e-5);
    }

    #[test]
    fn test_step_without_kinematics_is_inert() {
        let mut obj = Object::new(5.0, 5.0, 0.0);
        obj.step(1.0);
        assert_eq!(obj.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_step_integrates_velocity_along_heading() {
        let mut obj = Object::new(0.0, 0.0, 0.0).with_kinematics(Kinematics {
            velocity: 2.0,
            angular_velocity: 0.0,
        });
        obj.step(0.5);
        assert!((obj.position.x - 1.0).abs() < 1e-5);
        assert!(obj.position.y.abs() < 1e-5);

        obj.set_heading(90.0);
        obj.step(0.5);
        assert!((obj.position.x - 1.0).abs() < 1e-4);
        assert!((obj.position.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_applies_rotation_before_translation() {
        let mut obj = Object::new(0.0, 0.0, 0.0).with_kinematics(Kinematics {
            velocity: 1.0,
            angular_velocity: 90.0,
        });
        obj.step(1.0);
        assert!((obj.heading() - 90.0).abs() < 1e-4);
        // Moved along the post-rotation heading (straight up)
        assert!(obj.position.x.abs() < 1e-4);
        assert!((obj.position.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_serde_round_trip_preserves_pose_and_tag() {
        let obj = Object::new(3.5, -2.25, 123.0).with_tag("food");
        let json = serde_json::to_string(&obj).unwrap();
        let back: Object = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position, obj.position);
        assert_eq!(back.heading(), obj.heading());
        assert_eq!(back.tag, obj.tag);
        assert!(back.id().is_none());
    }
}
