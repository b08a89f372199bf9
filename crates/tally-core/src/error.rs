//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationErrors - Accumulated field errors for one config        │
//! │  │   └── FieldError   - One { field path, message } entry              │
//! │  └── ThresholdError   - Why a threshold list was rejected              │
//! │                                                                         │
//! │  tally-function errors (separate crate)                                │
//! │  └── FunctionError    - I/O, JSON decoding, env configuration          │
//! │                                                                         │
//! │  Flow: ThresholdError → FieldError → ValidationErrors → Admin UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation failures are returned, never panicked
//! 3. Field paths are segment lists so the UI can map them onto form fields
//! 4. Evaluation has no error type: "nothing applies" is a decision

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Field Error
// =============================================================================

/// A single validation failure scoped to a field path.
///
/// The path is an ordered list of segments. When the validator is called with
/// a prefix (e.g. `"configuration"`), the prefix is the first segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    /// Path segments, outermost first.
    pub field: Vec<String>,

    /// Human-readable message shown next to the field.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: Vec<String>, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }

    /// Returns the path joined with dots (`configuration.thresholds`).
    pub fn path(&self) -> String {
        self.field.join(".")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path(), self.message)
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// The ordered, non-empty set of errors produced by one validator call.
///
/// ## User Workflow
/// ```text
/// Merchant submits form
///      │
///      ▼
/// validate_shipping_config(raw, Some("configuration"))
///      │
///      ├── Ok(config)          → persisted as the discount configuration
///      │
///      └── Err(ValidationErrors)
///             │
///             ▼
///      UI highlights configuration.discount_value: "Must be a number"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[error("{message} ({} field error(s))", .errors.len())]
pub struct ValidationErrors {
    /// Summary message for the whole config.
    pub message: String,

    /// Field errors in the order the checks ran.
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Number of field errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for errors returned by the validators.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if any error targets the given field name (last segment).
    pub fn has_field(&self, name: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field.last().map(String::as_str) == Some(name))
    }

    /// Iterates over the field errors.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }
}

// =============================================================================
// Threshold Error
// =============================================================================

/// Why a threshold list could not be normalized.
///
/// One bad tuple rejects the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    /// A string input was not valid JSON.
    #[error("thresholds are not valid JSON: {0}")]
    Unparsable(String),

    /// The (parsed) value is not a list.
    #[error("thresholds must be a list of [percentage, minimum] pairs")]
    NotAList,

    /// A tuple is not a 2-element list.
    #[error("threshold #{index} must be a [percentage, minimum] pair")]
    MalformedTuple { index: usize },

    /// A tuple element does not coerce to a finite number.
    #[error("threshold #{index} must contain finite numbers")]
    NonNumeric { index: usize },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new(
            vec!["configuration".to_string(), "thresholds".to_string()],
            "Invalid thresholds",
        );
        assert_eq!(err.path(), "configuration.thresholds");
        assert_eq!(err.to_string(), "configuration.thresholds: Invalid thresholds");
    }

    #[test]
    fn test_validation_errors_message() {
        let errors = ValidationErrors {
            message: "Failed to validate shipping discount config".to_string(),
            errors: vec![
                FieldError::new(vec!["discount_type".to_string()], "bad"),
                FieldError::new(vec!["discount_value".to_string()], "bad"),
            ],
        };
        assert_eq!(
            errors.to_string(),
            "Failed to validate shipping discount config (2 field error(s))"
        );
        assert!(errors.has_field("discount_value"));
        assert!(!errors.has_field("title"));
    }

    #[test]
    fn test_threshold_error_messages() {
        let err = ThresholdError::MalformedTuple { index: 2 };
        assert_eq!(
            err.to_string(),
            "threshold #2 must be a [percentage, minimum] pair"
        );
    }
}
