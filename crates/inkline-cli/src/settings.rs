//! Geometry settings loaded from TOML.

use inkline_core::GeometryConfig;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load a config file. Fields it omits keep their defaults.
pub fn load(path: &Path) -> Result<GeometryConfig, SettingsError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<GeometryConfig, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Config from `path`, or the defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<GeometryConfig, SettingsError> {
    match path {
        Some(path) => {
            let config = load(path)?;
            log::info!("Loaded geometry settings from {}", path.display());
            Ok(config)
        }
        None => Ok(GeometryConfig::default()),
    }
}
