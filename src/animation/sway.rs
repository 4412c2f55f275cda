//! Idle sway of the hero model

use cgmath::Vector3;

use super::{Motion, MotionTransform};

/// Slow tilt-and-lift loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroSway {
    /// Resting tilt around X, radians
    pub base_tilt: f32,
}

impl Default for HeroSway {
    fn default() -> Self {
        Self {
            base_tilt: -std::f32::consts::PI / 1.75,
        }
    }
}

impl Motion for HeroSway {
    fn sample(&self, elapsed: f32) -> MotionTransform {
        let t = elapsed;
        let lift = 1.0 + (t / 1.5).sin();

        MotionTransform {
            rotation: Vector3::new(
                self.base_tilt + (t / 4.0).cos() / 8.0,
                (t / 4.0).sin() / 8.0,
                lift / 20.0,
            ),
            translation: Vector3::new(0.0, lift / 10.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sway_at_rest() {
        let sample = HeroSway::default().sample(0.0);
        let expected_x = -std::f32::consts::PI / 1.75 + 0.125;

        assert!((sample.rotation.x - expected_x).abs() < 1e-5);
        assert!(sample.rotation.y.abs() < 1e-5);
        assert!((sample.rotation.z - 0.05).abs() < 1e-5);
        assert!((sample.translation.y - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_lift_stays_in_bounds() {
        let sway = HeroSway::default();
        for step in 0..200 {
            let y = sway.sample(step as f32 * 0.37).translation.y;
            assert!((0.0..=0.2 + 1e-5).contains(&y));
        }
    }
}
