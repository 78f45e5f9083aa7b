//! Property-based deep equality
//!
//! Domain types without a usable `PartialEq` are compared through an ordered
//! [`PropertySet`]: a list of extractors, each returning one property of the
//! value as an optional [`PropertyValue`]. `None` plays the role of a null
//! property. Comparison per property is shallow and delegates to the
//! property's own `PartialEq`.
//!
//! ```rust
//! use brokerkit_testkit::matcher::{nullable, value, DeepEqualityMatcher, PropertySet};
//!
//! struct Endpoint {
//!     host: String,
//!     port: Option<u16>,
//! }
//!
//! let properties = PropertySet::new()
//!     .property("host", |e: &Endpoint| value(&e.host))
//!     .property("port", |e: &Endpoint| nullable(&e.port));
//!
//! let a = Endpoint { host: "zk".into(), port: Some(2181) };
//! let b = Endpoint { host: "zk".into(), port: Some(2181) };
//! assert!(DeepEqualityMatcher::new(Some(&a), &properties).matches_value(Some(&b)));
//! ```

use std::any::{self, Any};
use std::fmt;

/// A property value that can be compared against another of unknown type
pub trait PropertyValue: Any + fmt::Debug {
    /// Upcast for downcasting the other operand
    fn as_any(&self) -> &dyn Any;

    /// Value equality; values of different concrete types are unequal
    fn property_eq(&self, other: &dyn PropertyValue) -> bool;
}

impl<V> PropertyValue for V
where
    V: Any + PartialEq + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn property_eq(&self, other: &dyn PropertyValue) -> bool {
        other
            .as_any()
            .downcast_ref::<V>()
            .map_or(false, |other| self == other)
    }
}

/// One extracted property; `None` is a null property
pub type Property<'a> = Option<&'a dyn PropertyValue>;

/// Non-null property
pub fn value<V: PropertyValue>(value: &V) -> Property<'_> {
    Some(value as &dyn PropertyValue)
}

/// Property that is null when the option is `None`
pub fn nullable<V: PropertyValue>(value: &Option<V>) -> Property<'_> {
    value.as_ref().map(|value| value as &dyn PropertyValue)
}

type Extractor<T> = Box<dyn for<'a> Fn(&'a T) -> Property<'a> + Send + Sync>;

/// Ordered, immutable list of property extractors for `T`
pub struct PropertySet<T> {
    properties: Vec<(&'static str, Extractor<T>)>,
}

impl<T: 'static> PropertySet<T> {
    /// Empty set; every pair of `T` values matches it
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Append an extractor; `label` only appears in mismatch reports
    pub fn property<F>(mut self, label: &'static str, extractor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Property<'a> + Send + Sync + 'static,
    {
        self.properties.push((label, Box::new(extractor)));
        self
    }

    /// Number of extractors
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the set has no extractors
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Labels in evaluation order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|(label, _)| *label)
    }
}

impl<T: 'static> Default for PropertySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PropertySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.properties.iter().map(|(label, _)| label))
            .finish()
    }
}

/// Why two values did not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Exactly one operand was null
    NullOperand {
        /// Whether the expected operand was the null one
        expected_null: bool,
    },
    /// The actual operand is not of the expected type
    TypeMismatch {
        /// Type name of the expected operand
        expected: &'static str,
    },
    /// A property differed
    Property {
        /// Position of the extractor in the set
        index: usize,
        /// Label of the extractor
        label: &'static str,
        /// Debug rendering of the expected property, `None` when null
        expected: Option<String>,
        /// Debug rendering of the actual property, `None` when null
        actual: Option<String>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("null")
        }

        match self {
            Mismatch::NullOperand { expected_null: true } => {
                write!(f, "expected null but was a value")
            }
            Mismatch::NullOperand {
                expected_null: false,
            } => write!(f, "expected a value but was null"),
            Mismatch::TypeMismatch { expected } => {
                write!(f, "expected a value of type {expected}")
            }
            Mismatch::Property {
                index,
                label,
                expected,
                actual,
            } => write!(
                f,
                "property #{index} `{label}`: expected {} but was {}",
                render(expected),
                render(actual)
            ),
        }
    }
}

/// Matches values deeply equal to an expected value under a property set
#[derive(Debug)]
pub struct DeepEqualityMatcher<'m, T: 'static> {
    expected: Option<&'m T>,
    properties: &'m PropertySet<T>,
}

impl<'m, T: 'static> DeepEqualityMatcher<'m, T> {
    /// Matcher for `expected`; `None` expects null
    pub fn new(expected: Option<&'m T>, properties: &'m PropertySet<T>) -> Self {
        Self {
            expected,
            properties,
        }
    }

    /// Whether `actual` matches
    ///
    /// Identity and both-null short-circuit to true; a single null or a
    /// different runtime type is false; otherwise every property must match,
    /// stopping at the first that does not. Panics raised by extractors
    /// propagate to the caller.
    pub fn matches(&self, actual: Option<&dyn Any>) -> bool {
        self.first_mismatch(actual).is_none()
    }

    /// [`Self::matches`] for an operand already known to be a `T`
    pub fn matches_value(&self, actual: Option<&T>) -> bool {
        self.matches(actual.map(|actual| actual as &dyn Any))
    }

    /// The first reason `actual` does not match, `None` when it does
    pub fn first_mismatch(&self, actual: Option<&dyn Any>) -> Option<Mismatch> {
        let (expected, actual) = match (self.expected, actual) {
            (None, None) => return None,
            (Some(expected), Some(actual)) => (expected, actual),
            (expected, _) => {
                return Some(Mismatch::NullOperand {
                    expected_null: expected.is_none(),
                })
            }
        };

        let actual = match actual.downcast_ref::<T>() {
            Some(actual) if std::ptr::eq(expected, actual) => return None,
            Some(actual) => actual,
            None => {
                return Some(Mismatch::TypeMismatch {
                    expected: any::type_name::<T>(),
                })
            }
        };

        for (index, (label, extractor)) in self.properties.properties.iter().enumerate() {
            let expected_value = extractor(expected);
            let actual_value = extractor(actual);
            if !property_matches(expected_value, actual_value) {
                return Some(Mismatch::Property {
                    index,
                    label: *label,
                    expected: expected_value.map(|v| format!("{v:?}")),
                    actual: actual_value.map(|v| format!("{v:?}")),
                });
            }
        }
        None
    }
}

/// Same reference (both null included), or a non-null expected value equal to the actual one
fn property_matches(expected: Property<'_>, actual: Property<'_>) -> bool {
    match (expected, actual) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(expected), Some(actual)) if same_reference(expected, actual) => true,
        (Some(expected), actual) => actual.map_or(false, |actual| expected.property_eq(actual)),
    }
}

fn same_reference(a: &dyn PropertyValue, b: &dyn PropertyValue) -> bool {
    std::ptr::eq(
        a as *const dyn PropertyValue as *const (),
        b as *const dyn PropertyValue as *const (),
    ) && a.as_any().type_id() == b.as_any().type_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair {
        left: Option<String>,
        right: Option<u32>,
    }

    fn pair_properties() -> PropertySet<Pair> {
        PropertySet::new()
            .property("left", |p: &Pair| nullable(&p.left))
            .property("right", |p: &Pair| nullable(&p.right))
    }

    #[test]
    fn test_property_eq_across_types_is_false() {
        let a: &dyn PropertyValue = &1u32;
        let b: &dyn PropertyValue = &1u64;
        assert!(!a.property_eq(b));
        assert!(a.property_eq(&1u32));
    }

    #[test]
    fn test_same_reference_for_same_field() {
        let pair = Pair {
            left: Some("x".to_string()),
            right: None,
        };
        let first: &dyn PropertyValue = &pair.left;
        let second: &dyn PropertyValue = &pair.left;
        assert!(same_reference(first, second));
        let copy = pair.left.clone();
        assert!(!same_reference(first, &copy));
    }

    #[test]
    fn test_property_matches_null_rules() {
        assert!(property_matches(None, None));
        assert!(!property_matches(None, Some(&1u32)));
        assert!(!property_matches(Some(&1u32), None));
        assert!(property_matches(Some(&1u32), Some(&1u32)));
        assert!(!property_matches(Some(&1u32), Some(&2u32)));
    }

    #[test]
    fn test_first_mismatch_names_property() {
        let properties = pair_properties();
        let a = Pair {
            left: Some("a".to_string()),
            right: Some(1),
        };
        let b = Pair {
            left: Some("a".to_string()),
            right: Some(2),
        };
        let mismatch = DeepEqualityMatcher::new(Some(&a), &properties)
            .first_mismatch(Some(&b as &dyn Any))
            .unwrap();
        assert_eq!(
            mismatch,
            Mismatch::Property {
                index: 1,
                label: "right",
                expected: Some("1".to_string()),
                actual: Some("2".to_string()),
            }
        );
        assert_eq!(mismatch.to_string(), "property #1 `right`: expected 1 but was 2");
    }

    #[test]
    fn test_null_operand_mismatch() {
        let properties = pair_properties();
        let a = Pair {
            left: None,
            right: None,
        };
        let expected_null = DeepEqualityMatcher::new(None, &properties);
        assert_eq!(
            expected_null.first_mismatch(Some(&a as &dyn Any)),
            Some(Mismatch::NullOperand {
                expected_null: true
            })
        );
        let actual_null = DeepEqualityMatcher::new(Some(&a), &properties);
        assert_eq!(
            actual_null.first_mismatch(None),
            Some(Mismatch::NullOperand {
                expected_null: false
            })
        );
    }

    #[test]
    fn test_empty_set_matches_any_same_type() {
        let properties = PropertySet::<Pair>::new();
        let a = Pair {
            left: Some("a".to_string()),
            right: None,
        };
        let b = Pair {
            left: None,
            right: Some(9),
        };
        assert!(properties.is_empty());
        assert!(DeepEqualityMatcher::new(Some(&a), &properties).matches_value(Some(&b)));
    }

    #[test]
    fn test_debug_lists_labels() {
        assert_eq!(format!("{:?}", pair_properties()), r#"["left", "right"]"#);
        assert_eq!(pair_properties().labels().collect::<Vec<_>>(), vec!["left", "right"]);
    }
}
