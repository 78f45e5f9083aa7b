//! brokerkit testing infrastructure
//!
//! Test support for service broker implementations: deep-equality matchers
//! for broker models that have no usable `PartialEq`, model factories,
//! secured coordination node provisioning and an in-memory coordination
//! backend to run it against.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! brokerkit-testkit = { path = "../brokerkit-testkit" }
//! ```
//!
//! Then in your tests:
//! ```rust
//! use brokerkit_testkit::*;
//!
//! let factory = CfModelsFactory::deterministic(42);
//! let instance = factory.service_instance();
//! assert_deeply_equal!(instance.clone(), instance);
//!
//! let backend = MemoryCoordinationBackend::new();
//! let credential = Credential::new("localhost:2181", "broker", "s3cret");
//! create_secured_node(&backend, &credential, "/secured").unwrap();
//! assert_eq!(backend.open_session_count(), 0);
//! ```

pub mod assertions;
pub mod coordination;
pub mod factories;
pub mod fixtures;
pub mod logging;
pub mod matcher;
pub mod mock_backend;
pub mod strategies;

// Re-export commonly used items
pub use assertions::*;
pub use coordination::{
    authorized_options, create_secured_node, create_secured_node_with_policy, new_authorized_client,
    new_client, ScopedSession,
};
pub use factories::CfModelsFactory;
pub use fixtures::SecuredNodeFixture;
pub use logging::{init_test_logging, init_test_logging_with};
pub use matcher::{nullable, value, DeepEqualityMatcher, Mismatch, PropertySet, PropertyValue};
pub use mock_backend::{MemoryCoordinationBackend, MemorySession, SessionRecord};

// Re-export commonly used external types for convenience
pub use brokerkit_core::{
    CoordinationBackend, CoordinationError, CoordinationSession, Credential, ProvisioningError,
    RetryPolicy,
};
pub use brokerkit_model::{ServiceInstance, ServiceInstanceBinding};
