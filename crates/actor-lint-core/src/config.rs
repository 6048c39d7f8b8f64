//! TOML configuration for a lint run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Run configuration. Every field has a default, and the file itself
/// is optional.
///
/// ```toml
/// extensions = ["swift"]
/// workers = 4
/// disabled_rules = ["behavior_naming"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File extensions to scan.
    pub extensions: Vec<String>,
    /// Worker-pool size override; defaults to core count minus
    /// headroom for the non-pool stages.
    pub workers: Option<usize>,
    /// Identifiers of rules to skip entirely.
    pub disabled_rules: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["swift".to_owned()],
            workers: None,
            disabled_rules: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// True unless `identifier` is listed in `disabled_rules`.
    #[must_use]
    pub fn is_rule_enabled(&self, identifier: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["swift"]);
        assert!(config.workers.is_none());
        assert!(config.is_rule_enabled("anything"));
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config =
            toml::from_str("disabled_rules = [\"behavior_naming\"]").unwrap();
        assert_eq!(config.extensions, vec!["swift"]);
        assert!(!config.is_rule_enabled("behavior_naming"));
        assert!(config.is_rule_enabled("actor_private_functions"));
    }
}
