//! Layered configuration for brokerkit
//!
//! Defaults are overlaid by an optional TOML file and then by `BROKERKIT_*`
//! environment variables before validation.

pub mod testkit;
pub mod traits;
pub mod validation;

pub use testkit::{CoordinationConfig, LoggingConfig, TestkitConfig};
pub use traits::{normalize_key, KitConfig};
pub use validation::{ConfigValidator, ValidationError};
