//! # Validation Module
//!
//! Turns untrusted merchant input into canonical discount configurations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form (TypeScript)                                      │
//! │  ├── Same validator shapes via ts-rs bindings                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Every check runs; errors accumulate                               │
//! │  └── Ok(canonical config) XOR Err(non-empty ValidationErrors)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Evaluators                                                   │
//! │  └── Re-check the invariants they rely on, degrade to NoDiscount       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use tally_core::validation::validate_shipping_config;
//!
//! let raw = json!({
//!     "customer_tags_type": "exclude",
//!     "customer_tags": "wholesale, staff",
//!     "discount_value": "5",
//!     "discount_type": "fixed",
//! });
//! let config = validate_shipping_config(&raw, None).unwrap();
//! assert_eq!(config.customer_tags, vec!["wholesale", "staff"]);
//! assert_eq!(config.discount_value, 5.0);
//! ```

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FieldError, ValidationErrors};
use crate::number::numeric_field;
use crate::tags::{is_tag_input, parse_tags};
use crate::thresholds::normalize_thresholds;
use crate::types::{CustomerTagsType, DiscountType, ShippingDiscountConfig, TieredDiscountConfig};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

const SHIPPING_FAILED: &str = "Failed to validate shipping discount config";
const TIERED_FAILED: &str = "Failed to validate tiered discount config";

// =============================================================================
// Error Collector
// =============================================================================

/// Accumulates field errors for one validator call, prepending the optional
/// field-path prefix to every entry.
#[derive(Debug)]
struct ErrorCollector<'a> {
    message: &'static str,
    prefix: Option<&'a str>,
    errors: Vec<FieldError>,
}

impl<'a> ErrorCollector<'a> {
    fn new(message: &'static str, prefix: Option<&'a str>) -> Self {
        ErrorCollector {
            message,
            prefix,
            errors: Vec::new(),
        }
    }

    fn add(&mut self, field: &str, message: &str) {
        let mut path: Vec<String> = self.prefix.map(str::to_string).into_iter().collect();
        if !field.is_empty() {
            path.push(field.to_string());
        }
        self.errors.push(FieldError::new(path, message));
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn finish(self) -> ValidationErrors {
        debug!(
            config = self.message,
            errors = self.errors.len(),
            "discount config rejected"
        );
        ValidationErrors {
            message: self.message.to_string(),
            errors: self.errors,
        }
    }
}

/// Returns the object's fields or a single root-level error.
fn as_object<'v>(
    raw: &'v Value,
    message: &'static str,
    prefix: Option<&str>,
) -> ValidationResult<&'v Map<String, Value>> {
    raw.as_object().ok_or_else(|| {
        let mut errors = ErrorCollector::new(message, prefix);
        errors.add("", "Must be an object");
        errors.finish()
    })
}

/// Reads a field, treating JSON `null` as absent.
fn field<'v>(fields: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn title(fields: &Map<String, Value>) -> String {
    field(fields, "title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Shipping Discount
// =============================================================================

/// Validates a flat shipping discount configuration.
///
/// ## Rules
/// - `customer_tags_type`: exactly `"include"` or `"exclude"`
/// - `customer_tags`: parsed with [`parse_tags`]
/// - `discount_value`: a finite number (numeric strings accepted), `>= 0`,
///   and `<= 100` when `discount_type` is `"percentage"`
/// - `discount_type`: exactly `"fixed"` or `"percentage"`
/// - `discount_message`: optional string, trimmed
/// - `title`: anything but a string becomes `""`
/// - `allow_guest`: never an error; kept when it is a boolean, any other
///   value is discarded (stored as absent)
///
/// All rules run; every failure is reported.
pub fn validate_shipping_config(
    raw: &Value,
    prefix: Option<&str>,
) -> ValidationResult<ShippingDiscountConfig> {
    let fields = as_object(raw, SHIPPING_FAILED, prefix)?;
    let mut errors = ErrorCollector::new(SHIPPING_FAILED, prefix);

    let customer_tags_type = field(fields, "customer_tags_type")
        .and_then(Value::as_str)
        .and_then(CustomerTagsType::parse);
    if customer_tags_type.is_none() {
        errors.add("customer_tags_type", "Must be 'include' or 'exclude'");
    }

    let customer_tags = parse_tags(field(fields, "customer_tags").unwrap_or(&Value::Null));

    let discount_type = field(fields, "discount_type")
        .and_then(Value::as_str)
        .and_then(DiscountType::parse);

    let discount_value = field(fields, "discount_value").and_then(numeric_field);
    match discount_value {
        None => errors.add("discount_value", "Must be a number"),
        Some(value) if value < 0.0 => {
            errors.add("discount_value", "Must be greater than or equal to 0")
        }
        Some(_) => {}
    }

    if discount_type.is_none() {
        errors.add("discount_type", "Must be 'fixed' or 'percentage'");
    }

    if let (Some(DiscountType::Percentage), Some(value)) = (discount_type, discount_value) {
        if value > 100.0 {
            errors.add("discount_value", "Must be less than or equal to 100");
        }
    }

    let discount_message = match field(fields, "discount_message") {
        None => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.add("discount_message", "Must be a string");
            None
        }
    };

    let allow_guest = field(fields, "allow_guest").and_then(Value::as_bool);

    match (customer_tags_type, discount_value, discount_type) {
        (Some(customer_tags_type), Some(discount_value), Some(discount_type))
            if errors.is_empty() =>
        {
            Ok(ShippingDiscountConfig {
                title: title(fields),
                allow_guest,
                customer_tags_type,
                customer_tags,
                discount_value,
                discount_type,
                discount_message,
            })
        }
        _ => Err(errors.finish()),
    }
}

// =============================================================================
// Tiered Discount
// =============================================================================

/// Validates a tiered order discount configuration.
///
/// ## Rules
/// - `thresholds`: must normalize (see [`normalize_thresholds`]); the stored
///   list is the clamped, sorted result
/// - `ensureAnyCustomerTags`, `excludedProductTags`: parsed with
///   [`parse_tags`]; a present value that is neither a string nor a list of
///   strings is also reported as "Must be an array"
/// - `title`: anything but a string becomes `""`
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_core::validation::validate_tiered_config;
///
/// let errors = validate_tiered_config(
///     &json!({ "thresholds": "[[5, 0], [10]]", "excludedProductTags": 3 }),
///     Some("configuration"),
/// )
/// .unwrap_err();
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.errors[0].field, vec!["configuration", "thresholds"]);
/// ```
pub fn validate_tiered_config(
    raw: &Value,
    prefix: Option<&str>,
) -> ValidationResult<TieredDiscountConfig> {
    let fields = as_object(raw, TIERED_FAILED, prefix)?;
    let mut errors = ErrorCollector::new(TIERED_FAILED, prefix);

    let thresholds = match normalize_thresholds(field(fields, "thresholds").unwrap_or(&Value::Null))
    {
        Ok(list) => Some(list),
        Err(reason) => {
            debug!(%reason, "thresholds rejected");
            errors.add("thresholds", "Invalid thresholds");
            None
        }
    };

    let ensure_any_customer_tags = tag_field(fields, "ensureAnyCustomerTags", &mut errors);
    let excluded_product_tags = tag_field(fields, "excludedProductTags", &mut errors);

    match thresholds {
        Some(thresholds) if errors.is_empty() => Ok(TieredDiscountConfig {
            title: title(fields),
            thresholds,
            ensure_any_customer_tags,
            excluded_product_tags,
        }),
        _ => Err(errors.finish()),
    }
}

/// Parses a tag field, flagging shapes that had to be coerced away.
fn tag_field(fields: &Map<String, Value>, name: &str, errors: &mut ErrorCollector<'_>) -> Vec<String> {
    match field(fields, name) {
        None => Vec::new(),
        Some(value) => {
            if !is_tag_input(value) {
                errors.add(name, "Must be an array");
            }
            parse_tags(value)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
