//! Engine configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the forms engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Sort weight for `ui:part`s without a `ui:sequence` (default: 9999).
    pub unsequenced_weight: i64,
    /// Label of the synthetic "mint new" option in selectors.
    pub mint_label: String,
    /// Prompt shown by category selectors when nothing is selected.
    pub classify_prompt: String,
    /// How many class members `properties_for_class` inspects for used predicates.
    pub member_scan_limit: usize,
    /// Maximum number of hits the built-in search provider lists.
    pub search_result_limit: usize,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            unsequenced_weight: 9999,
            mint_label: "* New *".to_string(),
            classify_prompt: "--classify--".to_string(),
            member_scan_limit: 60,
            search_result_limit: 20,
        }
    }
}

impl FormsConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = FormsConfig::from_toml_str("mint_label = \"Create…\"\n").unwrap();
        assert_eq!(config.mint_label, "Create…");
        assert_eq!(config.unsequenced_weight, 9999);
        assert_eq!(config.member_scan_limit, 60);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = FormsConfig::from_toml_str("unsequenced_weight = \"heavy\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("forms.toml");
        std::fs::write(&path, "search_result_limit = 5\n").unwrap();
        let config = FormsConfig::load(&path).unwrap();
        assert_eq!(config.search_result_limit, 5);
    }
}
