//! # Number Coercion
//!
//! Form submissions and stored configs carry numbers as JSON numbers or as
//! strings typed by the merchant. These helpers decide what counts as a number.
//!
//! ## Coercion Table
//! ```text
//! ┌──────────────────────┬───────────────────────────┬──────────────────────┐
//! │ Input                │ coerce_number             │ numeric_field        │
//! ├──────────────────────┼───────────────────────────┼──────────────────────┤
//! │ 12.5                 │ Some(12.5)                │ Some(12.5)           │
//! │ " 600 "              │ Some(600.0)               │ Some(600.0)          │
//! │ ""                   │ Some(0.0)                 │ Some(0.0)            │
//! │ "abc" / "Infinity"   │ None                      │ None                 │
//! │ true / false         │ Some(1.0) / Some(0.0)     │ None                 │
//! │ null                 │ Some(0.0)                 │ None                 │
//! │ [..] / {..}          │ None                      │ None                 │
//! └──────────────────────┴───────────────────────────┴──────────────────────┘
//! ```
//!
//! Every `Some` is finite.

use serde_json::Value;

/// Coerces any scalar to a finite number, the way threshold tuples are read.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a numeric form field: JSON numbers and numeric strings only.
pub fn numeric_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parses a decimal string. Blank strings are zero.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    // f64::from_str also accepts "inf" and "NaN"; neither is a usable amount.
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Renders a number the way discount messages and the admin UI show it.
///
/// Integers have no fraction (`10`, not `10.0`) and negative zero prints as
/// `0`.
///
/// ## Example
/// ```rust
/// use tally_core::number::format_number;
///
/// assert_eq!(format_number(10.0), "10");
/// assert_eq!(format_number(12.5), "12.5");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}
