//! Testkit configuration: coordination backend and logging

use super::traits::{normalize_key, KitConfig};
use super::validation::ConfigValidator;
use crate::coordination::{validate_path, Credential, RetryPolicy};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Top-level testkit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestkitConfig {
    /// Coordination backend section
    pub coordination: CoordinationConfig,
    /// Logging section
    pub logging: LoggingConfig,
}

/// Coordination backend settings for integration tests
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Connect string, e.g. `localhost:2181`
    pub connect_string: String,
    /// Digest username for secured nodes
    pub username: Option<String>,
    /// Digest password for secured nodes
    pub password: Option<String>,
    /// Fixed delay before the retry, in milliseconds
    pub retry_delay_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Parent path under which tests create their nodes
    pub root_path: String,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            connect_string: "localhost:2181".to_string(),
            username: None,
            password: None,
            retry_delay_ms: RetryPolicy::DEFAULT_DELAY.as_millis() as u64,
            max_retries: 1,
            root_path: "/brokerkit".to_string(),
        }
    }
}

impl fmt::Debug for CoordinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinationConfig")
            .field("connect_string", &self.connect_string)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("root_path", &self.root_path)
            .finish()
    }
}

impl CoordinationConfig {
    /// Retry policy described by this section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// Credential for secured nodes; fails when username or password is unset
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| ConfigError::invalid("coordination.username", "not configured"))?;
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| ConfigError::invalid("coordination.password", "not configured"))?;
        Ok(Credential::new(&self.connect_string, username, password))
    }

    /// Absolute path of `name` below [`Self::root_path`]
    pub fn node_path(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        if self.root_path == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.root_path)
        }
    }

    fn validate_into(&self, validator: &mut ConfigValidator) {
        validator
            .require_non_empty("connect_string", &self.connect_string)
            .require_range("retry_delay_ms", self.retry_delay_ms, 0, 60_000)
            .require_range("max_retries", u64::from(self.max_retries), 0, 10)
            .check(
                "root_path",
                validate_path(&self.root_path).is_ok(),
                format!("{:?} is not a valid node path", self.root_path),
            )
            .check(
                "password",
                self.username.is_some() == self.password.is_some(),
                "username and password must be set together",
            );
    }
}

/// Logging settings for [`tracing_subscriber`]-style filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl KitConfig for TestkitConfig {
    const ENV_PREFIX: &'static str = "BROKERKIT_";

    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = normalize_key(key);
        let coordination = &mut self.coordination;
        match key.as_str() {
            "coordination_connect_string" => coordination.connect_string = value.to_string(),
            "coordination_username" => coordination.username = Some(value.to_string()),
            "coordination_password" => coordination.password = Some(value.to_string()),
            "coordination_retry_delay_ms" => {
                coordination.retry_delay_ms = parse_number(&key, value)?;
            }
            "coordination_max_retries" => {
                coordination.max_retries = parse_number(&key, value)?;
            }
            "coordination_root_path" => coordination.root_path = value.to_string(),
            "logging_filter" => self.logging.filter = value.to_string(),
            _ => {
                tracing::debug!(key = %key, "ignoring unknown configuration key");
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut validator = ConfigValidator::for_section("coordination");
        self.coordination.validate_into(&mut validator);
        validator.finish()?;

        ConfigValidator::for_section("logging")
            .require_non_empty("filter", &self.logging.filter)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("{value:?} is not a number")))
}
