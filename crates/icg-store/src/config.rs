//! Configuration document loading.
//!
//! A configuration document bootstraps the store when nothing has been
//! persisted yet. JSON and YAML are both accepted.

use icg_core::{ConfigData, IcgError, Result};
use std::path::Path;

/// Serialization of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml`/`.yml` are YAML, anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse a configuration document from text
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<ConfigData> {
    match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| IcgError::Config(e.to_string())),
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| IcgError::Config(e.to_string())),
    }
}

/// Load a configuration document from disk
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_config(&text, ConfigFormat::from_path(path))
}
