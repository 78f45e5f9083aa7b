//! Configuration validation utilities and rules

use crate::errors::ConfigError;
use std::fmt;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is required but missing
    Required {
        /// Dotted field name
        field: String,
    },
    /// Value is out of acceptable range
    OutOfRange {
        /// Dotted field name
        field: String,
        /// Inclusive lower bound
        min: u64,
        /// Inclusive upper bound
        max: u64,
        /// Offending value
        actual: u64,
    },
    /// Custom validation failed
    Custom {
        /// Dotted field name
        field: String,
        /// Error message
        message: String,
    },
}

impl ValidationError {
    fn field(&self) -> &str {
        match self {
            Self::Required { field } | Self::OutOfRange { field, .. } | Self::Custom { field, .. } => {
                field
            }
        }
    }

    fn reason(&self) -> String {
        match self {
            Self::Required { .. } => "required but missing".to_string(),
            Self::OutOfRange {
                min, max, actual, ..
            } => format!("must be between {min} and {max} (got {actual})"),
            Self::Custom { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field '{}': {}", self.field(), self.reason())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::invalid(err.field(), err.reason())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator for a nested section
    pub fn for_section(section: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: section.to_string(),
        }
    }

    fn qualified(&self, field: &str) -> String {
        if self.field_prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.field_prefix, field)
        }
    }

    /// Require a non-blank string
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: self.qualified(field),
            });
        }
        self
    }

    /// Require `min <= value <= max`
    pub fn require_range(&mut self, field: &str, value: u64, min: u64, max: u64) -> &mut Self {
        if value < min || value > max {
            self.errors.push(ValidationError::OutOfRange {
                field: self.qualified(field),
                min,
                max,
                actual: value,
            });
        }
        self
    }

    /// Record a custom failure when `ok` is false
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(ValidationError::Custom {
                field: self.qualified(field),
                message: message.into(),
            });
        }
        self
    }

    /// Errors collected so far
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Fail with the first collected error, if any
    pub fn finish(&mut self) -> Result<(), ConfigError> {
        if self.errors.len() > 1 {
            tracing::debug!(count = self.errors.len(), "multiple configuration errors");
        }
        match self.errors.drain(..).next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
