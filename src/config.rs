use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MapError, Result};
use crate::palette::{Color, ColorsPalette, SupportedColor};

const LOCAL_CONFIG: &str = "./roborock-map.toml";
const USER_CONFIG: &str = ".roborock-map.toml";

/// Represents the complete configuration for roborock-map.
///
/// Contains image rendering options, palette overrides, and release settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub colors: ColorsConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_scale() -> f64 {
    1.0
}

/// Rendering options for the floor image.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageConfig {
    #[serde(default = "default_scale")]
    pub scale: f64,

    #[serde(default)]
    pub trim: TrimConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            scale: default_scale(),
            trim: TrimConfig::default(),
        }
    }
}

/// Percentage of the image cut from each side before rendering.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub struct TrimConfig {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
}

/// Palette overrides.
///
/// Any pixel class left out keeps its built-in color. An empty
/// `room_colors` keeps the built-in room colors.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ColorsConfig {
    #[serde(flatten)]
    pub overrides: HashMap<SupportedColor, Color>,

    #[serde(default)]
    pub room_colors: Vec<Color>,
}

impl ColorsConfig {
    pub fn palette(&self) -> ColorsPalette {
        ColorsPalette::new(self.overrides.clone(), self.room_colors.clone())
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_tag_env() -> String {
    "RELEASE_TAG".to_string()
}

/// Settings for deriving and stamping release versions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Manifest whose `version = "..."` line is stamped
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Environment variable holding the release tag when none is given
    #[serde(default = "default_tag_env")]
    pub tag_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            manifest: default_manifest(),
            tag_env: default_tag_env(),
        }
    }
}

impl Config {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        let image = &self.image;
        if !(image.scale.is_finite() && image.scale > 0.0) {
            return Err(MapError::config(format!(
                "image.scale must be a positive number, got {}",
                image.scale
            )));
        }

        let trim = &image.trim;
        for (side, value) in [
            ("left", trim.left),
            ("right", trim.right),
            ("top", trim.top),
            ("bottom", trim.bottom),
        ] {
            if !(0.0..100.0).contains(&value) {
                return Err(MapError::config(format!(
                    "image.trim.{} must be within [0, 100), got {}",
                    side, value
                )));
            }
        }
        if trim.left + trim.right >= 100.0 || trim.top + trim.bottom >= 100.0 {
            return Err(MapError::config("image.trim removes the whole image"));
        }

        if self.release.tag_env.trim().is_empty() {
            return Err(MapError::config("release.tag_env must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `roborock-map.toml` in current directory
/// 3. `.roborock-map.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err` - If a file exists but cannot be read, parsed, or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG).exists() {
        fs::read_to_string(LOCAL_CONFIG)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str).map_err(|e| MapError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
