//! Standard assertion helpers for tests
//!
//! Deep-equality assertions for the broker model types, built on
//! [`crate::matcher`], plus macros that panic with the first mismatching
//! property.

use crate::matcher::{nullable, value, DeepEqualityMatcher, Mismatch, PropertySet};
use brokerkit_model::{ServiceInstance, ServiceInstanceBinding};
use once_cell::sync::Lazy;
use std::any::Any;

static SERVICE_INSTANCE_PROPERTIES: Lazy<PropertySet<ServiceInstance>> = Lazy::new(|| {
    PropertySet::new()
        .property("dashboard_url", |i: &ServiceInstance| nullable(&i.dashboard_url))
        .property("organization_guid", |i: &ServiceInstance| {
            value(&i.organization_guid)
        })
        .property("plan_id", |i: &ServiceInstance| value(&i.plan_id))
        .property("service_definition_id", |i: &ServiceInstance| {
            value(&i.service_definition_id)
        })
        .property("service_instance_id", |i: &ServiceInstance| {
            value(&i.service_instance_id)
        })
        .property("space_guid", |i: &ServiceInstance| value(&i.space_guid))
});

static SERVICE_BINDING_PROPERTIES: Lazy<PropertySet<ServiceInstanceBinding>> = Lazy::new(|| {
    PropertySet::new()
        .property("app_guid", |b: &ServiceInstanceBinding| nullable(&b.app_guid))
        .property("credentials", |b: &ServiceInstanceBinding| {
            nullable(&b.credentials)
        })
        .property("id", |b: &ServiceInstanceBinding| value(&b.id))
        .property("service_instance_id", |b: &ServiceInstanceBinding| {
            value(&b.service_instance_id)
        })
        .property("syslog_drain_url", |b: &ServiceInstanceBinding| {
            nullable(&b.syslog_drain_url)
        })
});

/// Types with a canonical property set for deep equality
pub trait DeepEquality: Sized + 'static {
    /// Properties compared by [`deeply_equal_to`]
    fn deep_equality_properties() -> &'static PropertySet<Self>;
}

impl DeepEquality for ServiceInstance {
    fn deep_equality_properties() -> &'static PropertySet<Self> {
        &SERVICE_INSTANCE_PROPERTIES
    }
}

impl DeepEquality for ServiceInstanceBinding {
    fn deep_equality_properties() -> &'static PropertySet<Self> {
        &SERVICE_BINDING_PROPERTIES
    }
}

/// Matcher for values deeply equal to `expected`
pub fn deeply_equal_to<T: DeepEquality>(expected: &T) -> DeepEqualityMatcher<'_, T> {
    DeepEqualityMatcher::new(Some(expected), T::deep_equality_properties())
}

/// Assert that `actual` is deeply equal to `expected` under their canonical properties
#[track_caller]
pub fn assert_deep_eq<T: DeepEquality>(actual: &T, expected: &T) {
    assert_deep_eq_with(actual, expected, T::deep_equality_properties());
}

/// Assert that `actual` is deeply equal to `expected` under `properties`
#[track_caller]
pub fn assert_deep_eq_with<T: 'static>(actual: &T, expected: &T, properties: &PropertySet<T>) {
    let matcher = DeepEqualityMatcher::new(Some(expected), properties);
    if let Some(mismatch) = matcher.first_mismatch(Some(actual as &dyn Any)) {
        panic!(
            "values are not deeply equal ({}): {}",
            std::any::type_name::<T>(),
            mismatch
        );
    }
}

/// Assert that `actual` differs from `expected` under their canonical properties
#[track_caller]
pub fn assert_deep_ne<T: DeepEquality>(actual: &T, expected: &T) {
    if deeply_equal_to(expected).matches_value(Some(actual)) {
        panic!(
            "values are deeply equal ({}) but were expected to differ",
            std::any::type_name::<T>()
        );
    }
}

/// First mismatch between two values under their canonical properties
pub fn deep_mismatch<T: DeepEquality>(actual: &T, expected: &T) -> Option<Mismatch> {
    deeply_equal_to(expected).first_mismatch(Some(actual as &dyn Any))
}

/// Assert that two values are deeply equal
///
/// Uses the canonical property set of the type, or an explicit
/// [`PropertySet`] as third argument.
#[macro_export]
macro_rules! assert_deeply_equal {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::assertions::assert_deep_eq(&$actual, &$expected)
    };
    ($actual:expr, $expected:expr, $properties:expr $(,)?) => {
        $crate::assertions::assert_deep_eq_with(&$actual, &$expected, &$properties)
    };
}

/// Assert that two values are not deeply equal
#[macro_export]
macro_rules! assert_not_deeply_equal {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::assertions::assert_deep_ne(&$actual, &$expected)
    };
}
