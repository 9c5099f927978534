//! Analysis settings, loadable from TOML

use crate::error::AnalysisError;
use bindscope_core::CoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Joins module, enclosing type and declaration names into ids
    pub id_separator: String,
    /// Fail the analysis when a declaration has no model mapping
    pub strict: bool,
    /// Also claim functions returning `*T` as constructors of `T`
    pub pointer_constructors: bool,
    pub getter_prefix: String,
    pub setter_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            id_separator: "_".to_string(),
            strict: false,
            pointer_constructors: false,
            getter_prefix: "get_".to_string(),
            setter_prefix: "set_".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path.as_ref()).map_err(CoreError::from)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.id_separator.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "id_separator must not be empty".to_string(),
            ));
        }
        if self.getter_prefix.is_empty() || self.getter_prefix == self.setter_prefix {
            return Err(AnalysisError::InvalidConfig(format!(
                "getter prefix {:?} must be non-empty and differ from setter prefix {:?}",
                self.getter_prefix, self.setter_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str("strict = true\npointer_constructors = true\n").unwrap();
        assert!(config.strict);
        assert!(config.pointer_constructors);
        assert_eq!(config.id_separator, "_");
        assert_eq!(config.getter_prefix, "get_");
    }

    #[test]
    fn test_rejects_empty_separator() {
        let err = AnalysisConfig::from_toml_str("id_separator = \"\"").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = AnalysisConfig::from_toml_str("stirct = true").unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigParse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindscope.toml");
        fs::write(&path, "id_separator = \"__\"\n").unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.id_separator, "__");

        let missing = AnalysisConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, AnalysisError::Core(CoreError::Io(_))));
    }
}
