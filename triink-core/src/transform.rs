/// Spatial math kernel and model orientation state
///
/// Vector addition, subtraction, scaling, dot and cross products come from
/// `nalgebra::Vector3` directly. The axis rotations and face normal live here
/// so every stage rotates and derives normals the same way.
use nalgebra::{Rotation3, Vector3};
use std::f64::consts::PI;

use crate::geometry::Vec3;

/// Pitch limit, just short of the poles
pub const PITCH_LIMIT: f64 = PI * 0.49;

/// Radians of rotation per pixel of pointer drag
pub const DRAG_SENSITIVITY: f64 = 0.01;

/// Auto-rotation speed in radians per second
pub const AUTO_ROTATE_SPEED: f64 = 0.6;

/// Pure spatial operations used by the render pipeline
pub struct Transform;

impl Transform {
    /// Rotate a point about the X axis
    pub fn rotate_x(point: &Vec3, angle: f64) -> Vec3 {
        Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * point
    }

    /// Rotate a point about the Y axis
    pub fn rotate_y(point: &Vec3, angle: f64) -> Vec3 {
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * point
    }

    /// Model rotation: yaw about Y first, then pitch about X
    pub fn model_rotation(yaw: f64, pitch: f64) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), pitch)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), yaw)
    }

    /// Unnormalized face normal, `(b - a) x (c - a)`
    pub fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
        (b - a).cross(&(c - a))
    }
}

/// Model orientation in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelOrientation {
    pub yaw: f64,
    pub pitch: f64,
    /// Accumulated auto-rotation, added to yaw
    pub auto: f64,
}

impl ModelOrientation {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            auto: 0.0,
        }
    }

    /// Rotate by delta amounts, keeping pitch away from the poles
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply a pointer drag measured in pixels
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.rotate(dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
    }

    /// Advance the auto-rotation by `dt` seconds
    pub fn advance_auto(&mut self, dt: f64) {
        self.auto += AUTO_ROTATE_SPEED * dt;
    }

    pub fn effective_yaw(&self) -> f64 {
        self.yaw + self.auto
    }

    pub fn rotation(&self) -> Rotation3<f64> {
        Transform::model_rotation(self.effective_yaw(), self.pitch)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // x' = x cos + z sin, z' = -x sin + z cos
        let p = Transform::rotate_y(&Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert!(close(&p, &Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        // y' = y cos - z sin, z' = y sin + z cos
        let p = Transform::rotate_x(&Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2);
        assert!(close(&p, &Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_model_rotation_applies_yaw_then_pitch() {
        let p = Vec3::new(0.3, -1.2, 2.5);
        let (yaw, pitch) = (0.7, -0.4);
        let expected = Transform::rotate_x(&Transform::rotate_y(&p, yaw), pitch);
        let actual = Transform::model_rotation(yaw, pitch) * p;
        assert!(close(&expected, &actual));
    }

    #[test]
    fn test_face_normal_right_handed() {
        let n = Transform::face_normal(
            &Vec3::new(0.0, 0.0, 0.0),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(close(&n, &Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut state = ModelOrientation::default();
        state.drag(0.0, 10_000.0);
        assert!((state.pitch - PITCH_LIMIT).abs() < 1e-12);
        state.drag(25.0, -20_000.0);
        assert!((state.pitch + PITCH_LIMIT).abs() < 1e-12);
        assert!((state.yaw - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_auto_rotation_adds_to_yaw() {
        let mut state = ModelOrientation::new(0.5, 0.0);
        state.advance_auto(1.0);
        assert!((state.effective_yaw() - 1.1).abs() < 1e-12);
        state.reset();
        assert_eq!(state, ModelOrientation::default());
    }
}
