//! Showcase configuration
//!
//! Everything the caller controls lives here: the base scene, the placement
//! list, the hero model, backdrop, camera and window. Every section has a
//! default, so an empty file (or no file at all) reproduces the stock scene.
//!
//! ```toml
//! base = "assets/scene.glb"
//!
//! [[placements]]
//! url = "assets/Astronaut-transformed.glb"
//! scale = 0.3
//! floating = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{animation::float::FloatSettings, composition::PlacementDescriptor};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Scene scanned for slot markers
    pub base: String,
    pub placements: Vec<PlacementDescriptor>,
    pub hero: HeroConfig,
    #[serde(rename = "float")]
    pub float_motion: FloatSettings,
    pub environment: EnvironmentConfig,
    pub camera: CameraConfig,
    pub window: WindowConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            base: "assets/scene.glb".to_string(),
            placements: vec![
                PlacementDescriptor::new("assets/Astronaut-transformed.glb", 0.3, true),
                PlacementDescriptor::new("assets/FlightHelmet/glTF/FlightHelmet.gltf", 2.0, false),
            ],
            hero: HeroConfig::default(),
            float_motion: FloatSettings::default(),
            environment: EnvironmentConfig::default(),
            camera: CameraConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    /// Reads a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// The always-present animated model with its annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub enabled: bool,
    pub url: String,
    pub scale: f32,
    pub sway: bool,
    /// Text shown in the annotation overlay; empty hides it
    pub annotation: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "assets/watch.glb".to_string(),
            scale: 1.0,
            sway: true,
            annotation: "Hello :')".to_string(),
        }
    }
}

/// Flat backdrop and lighting terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub background: [f32; 3],
    pub ambient: f32,
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    pub light_intensity: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            background: [0.55, 0.55, 0.57],
            ambient: 0.35,
            light_position: [5.0, 10.0, 5.0],
            light_color: [1.0, 1.0, 1.0],
            light_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            pitch: 0.0,
            yaw: 0.0,
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            min_distance: 0.5,
            max_distance: 50.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub show_ui: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "slotscape".to_string(),
            width: 1200,
            height: 800,
            show_ui: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ShowcaseConfig::from_toml("").unwrap(), ShowcaseConfig::default());
    }

    #[test]
    fn test_default_placements_match_stock_scene() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.placements.len(), 2);
        assert!(config.placements[0].floating);
        assert_eq!(config.placements[0].scale, 0.3);
        assert!(!config.placements[1].floating);
        assert_eq!(config.placements[1].scale, 2.0);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = ShowcaseConfig::from_toml(
            r#"
            base = "assets/other.gltf"

            [[placements]]
            url = "a.glb"
            floating = true

            [camera]
            distance = 12.0

            [float]
            speed = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.base, "assets/other.gltf");
        assert_eq!(config.placements, vec![PlacementDescriptor::new("a.glb", 1.0, true)]);
        assert_eq!(config.camera.distance, 12.0);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.float_motion.speed, 4.0);
        assert_eq!(config.float_motion.float_intensity, 2.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base = \"from_file.glb\"").unwrap();

        let config = ShowcaseConfig::load(file.path()).unwrap();
        assert_eq!(config.base, "from_file.glb");
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            ShowcaseConfig::load("no/such/config.toml"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base = [").unwrap();
        assert!(matches!(
            ShowcaseConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
