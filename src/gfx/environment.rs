//! Backdrop and lighting of the showcase scene

use crate::config::EnvironmentConfig;

/// Directional-ish point light used by the forward shader
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 5.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// Flat-colour backdrop plus ambient and key light terms
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Environment {
    pub background: [f32; 3],
    pub ambient: f32,
    pub light: LightConfig,
}

impl Environment {
    /// Clear colour of the main pass
    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.background[0] as f64,
            g: self.background[1] as f64,
            b: self.background[2] as f64,
            a: 1.0,
        }
    }
}

impl From<EnvironmentConfig> for Environment {
    fn from(config: EnvironmentConfig) -> Self {
        Self {
            background: config.background,
            ambient: config.ambient.clamp(0.0, 1.0),
            light: LightConfig {
                position: config.light_position,
                color: config.light_color,
                intensity: config.light_intensity.max(0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_clamps_terms() {
        let env = Environment::from(EnvironmentConfig {
            ambient: 3.0,
            light_intensity: -1.0,
            ..Default::default()
        });
        assert_eq!(env.ambient, 1.0);
        assert_eq!(env.light.intensity, 0.0);
    }

    #[test]
    fn test_clear_color_is_opaque_background() {
        let env = Environment::from(EnvironmentConfig::default());
        let color = env.clear_color();
        assert_eq!(color.a, 1.0);
        assert!((color.r - 0.55).abs() < 1e-6);
    }
}
