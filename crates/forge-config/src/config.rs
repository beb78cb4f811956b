//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "forge";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where generated templates are written.
    pub output: OutputConfig,
    /// Tag/layer name table.
    pub layers: LayerConfig,
    /// Shaders known to the material resolver.
    pub shaders: ShaderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Output folder layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Root folder under which every category folder lives.
    pub base_folder: PathBuf,
    /// Folder for small standard objects.
    pub small_folder: String,
    /// Folder for medium standard objects.
    pub medium_folder: String,
    /// Folder for large standard objects.
    pub large_folder: String,
    /// Folder for harvestable resources.
    pub resource_folder: String,
    /// Folder for trees.
    pub tree_folder: String,
    /// Folder for bushes.
    pub bush_folder: String,
}

/// Tag/layer registry contents: layer name -> numeric layer id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayerConfig {
    /// Known layers. Names missing here resolve to the "no layer" sentinel.
    pub layers: HashMap<String, i32>,
}

/// Shader names available to generated materials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Every shader the registry can find.
    pub available: Vec<String>,
    /// Dedicated shader for foliage (leaves, bushes).
    pub foliage: String,
    /// Generic shader used when nothing more specific is found.
    pub default: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_folder: PathBuf::from("Assets/Objects"),
            small_folder: "Small".to_string(),
            medium_folder: "Medium".to_string(),
            large_folder: "Large".to_string(),
            resource_folder: "Resources".to_string(),
            tree_folder: "Trees".to_string(),
            bush_folder: "Bushes".to_string(),
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        let layers = [
            ("Navmesh", 8),
            ("Small", 9),
            ("Medium", 10),
            ("Large", 11),
            ("Resource", 12),
            ("Tree", 13),
            ("Bush", 14),
            ("Forage", 15),
        ]
        .into_iter()
        .map(|(name, id)| (name.to_string(), id))
        .collect();
        Self { layers }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            available: vec!["Standard".to_string(), "Nature/Foliage".to_string()],
            foliage: "Nature/Foliage".to_string(),
            default: "Standard".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: false,
        }
    }
}

impl OutputConfig {
    /// All category folder names, in a stable order.
    pub fn category_folders(&self) -> [&str; 6] {
        [
            self.small_folder.as_str(),
            self.medium_folder.as_str(),
            self.large_folder.as_str(),
            self.resource_folder.as_str(),
            self.tree_folder.as_str(),
            self.bush_folder.as_str(),
        ]
    }
}

/// Default config directory: `<os config dir>/forge`.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the OS exposes no config directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_NAME))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
