//! brokerkit core
//!
//! Shared foundation for the brokerkit test-support crates:
//!
//! - [`errors`]: coordination, provisioning and configuration error types
//! - [`coordination`]: credentials, digest ACLs, retry policy, node path rules
//!   and the backend/session traits integration helpers are written against
//! - [`config`]: layered TOML + environment configuration

#![forbid(unsafe_code)]

pub mod config;
pub mod coordination;
pub mod errors;

pub use config::{CoordinationConfig, KitConfig, LoggingConfig, TestkitConfig};
pub use coordination::{
    digest_identity, Acl, AuthInfo, CoordinationBackend, CoordinationSession, CreateRequest,
    Credential, Id, Perms, RetryPolicy, SessionOptions,
};
pub use errors::{BrokerKitError, ConfigError, CoordinationError, ProvisioningError, Result};
