//! Floating idle motion for placed models

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use super::{Motion, MotionTransform};

/// Upper bound of the random phase offset given to each floating model
const MAX_OFFSET: f32 = 10_000.0;

/// Tunables of the float motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatSettings {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    /// Output range the vertical bob is remapped to
    pub floating_range: [f32; 2],
}

impl Default for FloatSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_intensity: 1.0,
            float_intensity: 2.0,
            floating_range: [-0.1, 0.1],
        }
    }
}

/// Gentle bob and wobble, phase-shifted per instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatMotion {
    pub settings: FloatSettings,
    pub offset: f32,
}

impl FloatMotion {
    pub fn new(settings: FloatSettings, offset: f32) -> Self {
        Self { settings, offset }
    }

    /// Creates a motion with a random phase offset
    pub fn with_random_offset(settings: FloatSettings) -> Self {
        Self::new(settings, rand::random::<f32>() * MAX_OFFSET)
    }
}

impl Motion for FloatMotion {
    fn sample(&self, elapsed: f32) -> MotionTransform {
        let FloatSettings {
            speed,
            rotation_intensity,
            float_intensity,
            floating_range,
        } = self.settings;

        if speed == 0.0 {
            return MotionTransform::identity();
        }

        let phase = (self.offset + elapsed) / 4.0 * speed;
        let bob = map_linear(
            phase.sin() / 10.0,
            -0.1,
            0.1,
            floating_range[0],
            floating_range[1],
        );

        MotionTransform {
            rotation: Vector3::new(
                phase.cos() / 8.0 * rotation_intensity,
                phase.sin() / 8.0 * rotation_intensity,
                phase.sin() / 20.0 * rotation_intensity,
            ),
            translation: Vector3::new(0.0, bob * float_intensity, 0.0),
        }
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_starts_level_at_zero_phase() {
        let motion = FloatMotion::new(FloatSettings::default(), 0.0);
        let sample = motion.sample(0.0);

        assert!((sample.rotation.x - 0.125).abs() < EPS);
        assert!(sample.rotation.y.abs() < EPS);
        assert!(sample.rotation.z.abs() < EPS);
        assert!(sample.translation.y.abs() < EPS);
    }

    #[test]
    fn test_peak_height() {
        // speed 2: phase = t / 2, so sin peaks at t = pi
        let motion = FloatMotion::new(FloatSettings::default(), 0.0);
        let sample = motion.sample(std::f32::consts::PI);

        assert!((sample.translation.y - 0.2).abs() < EPS);
        assert!((sample.rotation.y - 0.125).abs() < EPS);
        assert!((sample.rotation.z - 0.05).abs() < EPS);
    }

    #[test]
    fn test_floating_range_remaps_bob() {
        let settings = FloatSettings {
            floating_range: [0.0, 1.0],
            float_intensity: 1.0,
            ..Default::default()
        };
        let motion = FloatMotion::new(settings, 0.0);

        assert!((motion.sample(0.0).translation.y - 0.5).abs() < EPS);
        assert!((motion.sample(std::f32::consts::PI).translation.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_speed_is_still() {
        let settings = FloatSettings {
            speed: 0.0,
            ..Default::default()
        };
        let motion = FloatMotion::new(settings, 3.0);
        assert_eq!(motion.sample(12.0), MotionTransform::identity());
    }

    #[test]
    fn test_random_offset_in_range() {
        let motion = FloatMotion::with_random_offset(FloatSettings::default());
        assert!(motion.offset >= 0.0 && motion.offset < MAX_OFFSET);
    }
}
