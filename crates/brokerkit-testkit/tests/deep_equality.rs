//! Deep-equality matcher behavior across null, identity, type and property cases

use brokerkit_testkit::matcher::{nullable, DeepEqualityMatcher, Property, PropertySet};
use brokerkit_testkit::strategies::{arb_service_binding, arb_service_instance};
use brokerkit_testkit::*;
use proptest::prelude::*;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Pojo {
    name: Option<String>,
    attributes: Option<BTreeMap<String, String>>,
}

impl Pojo {
    fn new(name: Option<&str>, attributes: Option<&[(&str, &str)]>) -> Self {
        Self {
            name: name.map(str::to_string),
            attributes: attributes.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
        }
    }
}

fn pojo_properties() -> PropertySet<Pojo> {
    PropertySet::new()
        .property("name", |p: &Pojo| nullable(&p.name))
        .property("attributes", |p: &Pojo| nullable(&p.attributes))
}

fn matches(expected: Option<&Pojo>, actual: Option<&dyn Any>) -> bool {
    let properties = pojo_properties();
    DeepEqualityMatcher::new(expected, &properties).matches(actual)
}

#[test]
fn test_same_reference_matches() {
    let pojo = Pojo::new(Some("abc"), Some(&[("k", "v")]));
    assert!(matches(Some(&pojo), Some(&pojo as &dyn Any)));
}

#[test]
fn test_both_null_matches() {
    assert!(matches(None, None));
}

#[test]
fn test_single_null_does_not_match() {
    let pojo = Pojo::new(Some("abc"), None);
    assert!(!matches(None, Some(&pojo as &dyn Any)));
    assert!(!matches(Some(&pojo), None));
}

#[test]
fn test_different_types_do_not_match() {
    let pojo = Pojo::new(Some("pojo2"), None);
    let other: &dyn Any = &"pojo2";
    assert!(!matches(Some(&pojo), Some(other)));
}

#[test]
fn test_different_types_do_not_match_with_empty_property_set() {
    let properties = PropertySet::<Pojo>::new();
    let pojo = Pojo::new(None, None);
    let other: &dyn Any = &42u32;
    assert!(!DeepEqualityMatcher::new(Some(&pojo), &properties).matches(Some(other)));
}

#[test]
fn test_equal_properties_match() {
    let a = Pojo::new(Some("abc"), Some(&[("k", "v")]));
    let b = Pojo::new(Some("abc"), Some(&[("k", "v")]));
    assert!(matches(Some(&a), Some(&b as &dyn Any)));
}

#[test]
fn test_different_map_value_does_not_match() {
    let a = Pojo::new(Some("abc"), Some(&[("k", "v")]));
    let b = Pojo::new(Some("abc"), Some(&[("k", "V")]));
    assert!(!matches(Some(&a), Some(&b as &dyn Any)));
}

#[test]
fn test_null_expected_property_does_not_match_empty_string() {
    let a = Pojo::new(None, None);
    let b = Pojo::new(Some(""), None);
    assert!(!matches(Some(&a), Some(&b as &dyn Any)));
}

#[test]
fn test_present_expected_property_does_not_match_null() {
    let a = Pojo::new(Some(""), None);
    let b = Pojo::new(None, None);
    assert!(!matches(Some(&a), Some(&b as &dyn Any)));
}

#[test]
fn test_all_null_properties_match() {
    let a = Pojo::new(None, None);
    let b = Pojo::new(None, None);
    assert!(matches(Some(&a), Some(&b as &dyn Any)));
}

#[test]
fn test_first_mismatch_short_circuits() {
    let second_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&second_calls);
    let properties = PropertySet::new()
        .property("name", |p: &Pojo| nullable(&p.name))
        .property("attributes", move |p: &Pojo| {
            counter.fetch_add(1, Ordering::SeqCst);
            nullable(&p.attributes)
        });

    let a = Pojo::new(Some("a"), Some(&[("k", "v")]));
    let b = Pojo::new(Some("b"), Some(&[("k", "v")]));
    let matcher = DeepEqualityMatcher::new(Some(&a), &properties);
    assert!(!matcher.matches(Some(&b as &dyn Any)));
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);

    let c = Pojo::new(Some("a"), Some(&[("k", "v")]));
    assert!(matcher.matches(Some(&c as &dyn Any)));
    assert_eq!(second_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_identity_skips_extractors() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let properties = PropertySet::new().property("name", move |p: &Pojo| {
        counter.fetch_add(1, Ordering::SeqCst);
        nullable(&p.name)
    });
    let pojo = Pojo::new(Some("abc"), None);
    assert!(DeepEqualityMatcher::new(Some(&pojo), &properties).matches_value(Some(&pojo)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
#[should_panic(expected = "extractor failure")]
fn test_extractor_panic_propagates() {
    fn broken(_: &Pojo) -> Property<'_> {
        panic!("extractor failure")
    }

    let properties = PropertySet::new().property("broken", broken);
    let a = Pojo::new(None, None);
    let b = Pojo::new(None, None);
    DeepEqualityMatcher::new(Some(&a), &properties).matches_value(Some(&b));
}

#[test]
fn test_factory_fixtures_match_clones() {
    let factory = CfModelsFactory::random();
    let instance = factory.service_instance();
    assert!(deeply_equal_to(&instance).matches_value(Some(&instance.clone())));

    let binding = factory.service_binding();
    assert!(deeply_equal_to(&binding).matches_value(Some(&binding.clone())));
}

#[test]
fn test_binding_credentials_compared_by_value() {
    let binding = CfModelsFactory::deterministic(11).service_binding();
    let mut credentials = brokerkit_model::Credentials::new();
    credentials.insert("password".to_string(), serde_json::json!("secret"));

    let with_credentials =
        CfModelsFactory::service_binding_with_credentials(&binding, credentials.clone());
    let again = CfModelsFactory::service_binding_with_credentials(&binding, credentials);
    assert_deeply_equal!(again, with_credentials);

    let mismatch = deep_mismatch(&binding, &with_credentials).unwrap();
    assert!(mismatch.to_string().starts_with("property #1 `credentials`"));
}

#[test]
fn test_dashboard_url_difference_detected() {
    let instance = CfModelsFactory::deterministic(12).service_instance();
    let with_dashboard = instance.clone().with_dashboard_url("https://dashboard.example.com");
    assert_not_deeply_equal!(with_dashboard, instance);
}

proptest! {
    #[test]
    fn prop_instance_clone_matches(instance in arb_service_instance()) {
        prop_assert!(deep_mismatch(&instance.clone(), &instance).is_none());
    }

    #[test]
    fn prop_binding_clone_matches(binding in arb_service_binding()) {
        prop_assert!(deep_mismatch(&binding.clone(), &binding).is_none());
    }

    #[test]
    fn prop_instance_plan_change_detected(
        instance in arb_service_instance(),
        suffix in "[a-z]{1,4}",
    ) {
        let mut changed = instance.clone();
        changed.plan_id.push_str(&suffix);
        prop_assert!(!deeply_equal_to(&instance).matches_value(Some(&changed)));
    }
}
