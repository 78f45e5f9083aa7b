//! Service broker domain model
//!
//! Catalog entries, service instances, bindings and the create/delete
//! request objects exchanged with a service broker. These types do not
//! implement `PartialEq`; tests compare them property by property with the
//! deep-equality matchers in `brokerkit-testkit`.

#![forbid(unsafe_code)]

pub mod binding;
pub mod catalog;
pub mod instance;

pub use binding::{
    CreateServiceInstanceBindingRequest, Credentials, DeleteServiceInstanceBindingRequest,
    ServiceInstanceBinding,
};
pub use catalog::{Plan, ServiceDefinition};
pub use instance::{CreateServiceInstanceRequest, DeleteServiceInstanceRequest, ServiceInstance};
