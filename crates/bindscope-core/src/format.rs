//! Reading and writing source descriptions and models as JSON or YAML

use crate::error::CoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

/// Serialization format, chosen from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            other => Err(CoreError::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(CoreError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, CoreError> {
        match self {
            Format::Json => Ok(serde_json::from_str(content)?),
            Format::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }

    pub fn render<T: Serialize>(self, value: &T) -> Result<String, CoreError> {
        match self {
            Format::Json => Ok(serde_json::to_string_pretty(value)?),
            Format::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Deserialize a file, picking the format from its extension
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    format.parse(&content)
}
