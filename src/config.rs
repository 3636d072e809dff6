//! Sandbox configuration
//!
//! Everything has a default, so a config file only needs the keys it wants to
//! change:
//!
//! ```toml
//! [window]
//! title = "My sandbox"
//!
//! [placement]
//! model_path = "assets/chair.obj"
//! fallback = "sphere"
//!
//! [materials.ground]
//! color = "#3a5f3a"
//! isFogAffected = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::gfx::geometry::PrimitiveShape;

/// Environment variable naming a config file when no argument is given.
pub const CONFIG_ENV_VAR: &str = "GRIDSCAPE_CONFIG";

/// Material record used for the ground plane.
pub const GROUND_MATERIAL: &str = "ground";
/// Material record used for the primitive templates.
pub const TEMPLATE_MATERIAL: &str = "template";

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gridscape".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length of the visible ground plane; placement is limited to it.
    pub extent: f32,
    pub ground_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            extent: 40.0,
            ground_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    /// Radians above the ground plane.
    pub pitch: f32,
    pub yaw: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 14.0,
            pitch: 0.8,
            yaw: 0.6,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// OBJ file loaded as the first template. Missing or broken files fall
    /// back to `fallback`.
    pub model_path: Option<PathBuf>,
    pub fallback: PrimitiveShape,
    pub free_color: [f32; 3],
    pub occupied_color: [f32; 3],
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            fallback: PrimitiveShape::Cube,
            free_color: [1.0, 1.0, 1.0],
            occupied_color: [1.0, 0.0, 0.0],
        }
    }
}

/// Complete sandbox configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    pub grid: GridConfig,
    pub camera: CameraConfig,
    pub placement: PlacementConfig,
    /// Untyped material records, classified when the scene is built.
    pub materials: BTreeMap<String, toml::Table>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(GROUND_MATERIAL.to_string(), default_ground_material());
        materials.insert(TEMPLATE_MATERIAL.to_string(), default_template_material());
        Self {
            window: WindowConfig::default(),
            grid: GridConfig::default(),
            camera: CameraConfig::default(),
            placement: PlacementConfig::default(),
            materials,
        }
    }
}

fn default_ground_material() -> toml::Table {
    let mut record = toml::Table::new();
    record.insert("color".into(), "#4a6b4a".into());
    record.insert("isFogAffected".into(), true.into());
    record
}

fn default_template_material() -> toml::Table {
    let mut record = toml::Table::new();
    record.insert("color".into(), "#c8a165".into());
    record.insert("isFogAffected".into(), true.into());
    record.insert("normalMap".into(), "".into());
    record.insert("roughness".into(), 0.6.into());
    record.insert("metalness".into(), 0.1.into());
    record
}

impl SandboxConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        // A file that declares some materials still gets the built-in ones it omits.
        let defaults = Self::default().materials;
        for (name, record) in defaults {
            config.materials.entry(name).or_insert(record);
        }
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads the file named by the first argument or by `GRIDSCAPE_CONFIG`.
    ///
    /// With neither present the defaults are used.
    pub fn from_env_or_args() -> Result<Self, ConfigError> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path);
                Self::load_from_file(path)
            }
            None => {
                log::info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.placement.model_path = Some(path.into());
        self
    }

    pub fn with_fallback(mut self, shape: PrimitiveShape) -> Self {
        self.placement.fallback = shape;
        self
    }

    pub fn with_material(mut self, name: impl Into<String>, record: toml::Table) -> Self {
        self.materials.insert(name.into(), record);
        self
    }

    /// The record for `name`, or an empty table if none was configured.
    pub fn material(&self, name: &str) -> toml::Table {
        self.materials.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::{classify, MaterialKind};

    #[test]
    fn defaults_classify_as_expected() {
        let config = SandboxConfig::default();
        assert_eq!(
            classify(config.material(GROUND_MATERIAL).keys()).unwrap(),
            MaterialKind::Basic
        );
        assert_eq!(
            classify(config.material(TEMPLATE_MATERIAL).keys()).unwrap(),
            MaterialKind::Standard
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = SandboxConfig::from_toml_str(
            r##"
            [window]
            title = "Test"

            [placement]
            fallback = "sphere"
            model_path = "assets/chair.obj"

            [materials.ground]
            color = "#000000"
            isFogAffected = false
            "##,
        )
        .unwrap();

        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.placement.fallback, PrimitiveShape::Sphere);
        assert_eq!(config.placement.model_path, Some(PathBuf::from("assets/chair.obj")));
        assert_eq!(config.material(GROUND_MATERIAL)["color"].as_str(), Some("#000000"));
        assert!(config.materials.contains_key(TEMPLATE_MATERIAL));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let result = SandboxConfig::from_toml_str("[window\ntitle = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SandboxConfig::load_from_file("/definitely/not/here/gridscape.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn builders_override_fields() {
        let config = SandboxConfig::default()
            .with_title("Built")
            .with_window_size(640, 480)
            .with_fallback(PrimitiveShape::Cylinder)
            .with_model_path("model.obj");
        assert_eq!(config.window.title, "Built");
        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert_eq!(config.placement.fallback, PrimitiveShape::Cylinder);
        assert!(config.placement.model_path.is_some());
    }
}
