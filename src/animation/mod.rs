//! # Animation Module
//!
//! Idle motions applied by the render driver each frame. A motion maps the
//! elapsed time to a [`MotionTransform`] (Euler rotation plus translation),
//! which is then combined with an object's placement transform.

pub mod float;
pub mod sway;

use cgmath::{Matrix4, Rad, Vector3};

pub use float::{FloatMotion, FloatSettings};
pub use sway::HeroSway;

/// Rotation (XYZ Euler, radians) and translation of an animated group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTransform {
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl MotionTransform {
    pub fn identity() -> Self {
        Self {
            rotation: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// `T * Rx * Ry * Rz`, the XYZ Euler order used by scene-graph nodes
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }
}

/// A time-driven idle motion
pub trait Motion {
    fn sample(&self, elapsed: f32) -> MotionTransform;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(MotionTransform::identity().matrix(), Matrix4::identity());
    }
}
