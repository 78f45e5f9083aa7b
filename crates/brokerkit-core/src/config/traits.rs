//! Core configuration trait for brokerkit configuration types

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Layered configuration: defaults, then a TOML file, then environment
pub trait KitConfig: Clone + Default + DeserializeOwned {
    /// Environment variable prefix, e.g. `BROKERKIT_`
    const ENV_PREFIX: &'static str;

    /// Parse configuration from TOML text; missing fields keep their defaults
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set a value by dotted (`a.b`) or underscore (`a_b`) key
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Merge variables carrying [`Self::ENV_PREFIX`]; others are ignored
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(Self::ENV_PREFIX) {
                self.set_from_string(&config_key.to_lowercase(), &value)?;
            }
        }
        Ok(())
    }

    /// Merge the process environment
    fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Defaults, overlaid with `path` if given, then the environment, then validated
    fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        tracing::debug!(source = ?path, "loaded configuration");
        Ok(config)
    }
}

/// Normalise a dotted or underscore key to underscore form
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('.', "_")
}
