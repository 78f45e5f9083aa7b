//! Property test strategies for broker model types
//!
//! Composable proptest strategies for service instances, bindings and
//! coordination credentials.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use brokerkit_core::Credential;
use brokerkit_model::{Credentials, ServiceInstance, ServiceInstanceBinding};

/// Strategy for lowercase identifiers such as GUIDs and plan ids
pub fn arb_guid() -> impl Strategy<Value = String> {
    "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}"
}

/// Strategy for optional URLs
pub fn arb_url() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("https://[a-z]{1,12}\\.example\\.com/[a-z0-9]{0,8}")
}

/// Strategy for small binding credential maps
pub fn arb_credentials() -> impl Strategy<Value = Credentials> {
    proptest::collection::btree_map(
        "[a-z_]{1,10}",
        prop_oneof![
            "[ -~]{0,16}".prop_map(serde_json::Value::from),
            any::<u16>().prop_map(serde_json::Value::from),
            any::<bool>().prop_map(serde_json::Value::from),
        ],
        0..4,
    )
}

/// Strategy for service instances
///
/// # Example
///
/// ```rust
/// use brokerkit_testkit::strategies::arb_service_instance;
/// use proptest::prelude::*;
///
/// proptest! {
///     #[test]
///     fn test_instance_property(instance in arb_service_instance()) {
///         assert!(!instance.plan_id.is_empty());
///     }
/// }
/// ```
pub fn arb_service_instance() -> impl Strategy<Value = ServiceInstance> {
    (arb_guid(), arb_guid(), arb_guid(), arb_guid(), arb_guid(), arb_url()).prop_map(
        |(instance_id, definition_id, plan_id, organization_guid, space_guid, dashboard_url)| {
            ServiceInstance {
                service_instance_id: instance_id,
                service_definition_id: definition_id,
                plan_id,
                organization_guid,
                space_guid,
                dashboard_url,
            }
        },
    )
}

/// Strategy for service instance bindings
pub fn arb_service_binding() -> impl Strategy<Value = ServiceInstanceBinding> {
    (
        arb_guid(),
        arb_guid(),
        proptest::option::of(arb_credentials()),
        arb_url(),
        proptest::option::of(arb_guid()),
    )
        .prop_map(|(id, instance_id, credentials, syslog_drain_url, app_guid)| {
            ServiceInstanceBinding::new(id, instance_id, credentials, syslog_drain_url, app_guid)
        })
}

/// Strategy for digest credentials on a fixed connect string
///
/// Usernames never contain `:`; passwords may.
pub fn arb_credential() -> impl Strategy<Value = Credential> {
    ("[a-z][a-z0-9_]{0,11}", "[ -~]{0,24}")
        .prop_map(|(username, password)| Credential::new("localhost:2181", username, password))
}
