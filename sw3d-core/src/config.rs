/// Render settings loadable from TOML
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geometry::Rgba;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Focal length must be positive
    #[error("Invalid focal length: {0}")]
    InvalidFocalLength(f64),
}

/// Initial pipeline state: camera focal length, culling flags and paint.
///
/// Every field has a default, so a config file only lists what it changes.
/// A missing colour disables that output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub focal_length: f64,
    pub draw_backfaces: bool,
    pub perform_z_sorting: bool,
    pub draw_overdraw: bool,
    pub fill_rgba: Option<Rgba>,
    pub stroke_rgba: Option<Rgba>,
    pub normal1_rgba: Option<Rgba>,
    pub normal2_rgba: Option<Rgba>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            focal_length: 1.0,
            draw_backfaces: false,
            perform_z_sorting: true,
            draw_overdraw: true,
            fill_rgba: Some(Rgba::WHITE),
            stroke_rgba: None,
            normal1_rgba: None,
            normal2_rgba: None,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.focal_length > 0.0) {
            return Err(ConfigError::InvalidFocalLength(self.focal_length));
        }
        Ok(())
    }
}
