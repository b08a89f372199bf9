//! # Threshold List Normalizer
//!
//! Tiered discounts are a list of `[percentage, minimum order total]` pairs.
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw input (form text or stored JSON)                                  │
//! │       │                                                                 │
//! │       ├── string? ── trim ── "" → []                                   │
//! │       │                  └── JSON parse ── fails → Unparsable          │
//! │       ▼                                                                 │
//! │  list? ──────────────────────────────────── no → NotAList              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  every tuple [pct, min]? ───────────────── no → MalformedTuple         │
//! │  every item a finite number? ───────────── no → NonNumeric             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clamp pct to [0, 100], min to [0, ∞)      (silently corrected)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stable sort ascending by min                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The input is never modified; a new list is returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ThresholdError;
use crate::number::coerce_number;

/// Result type for threshold normalization.
pub type ThresholdResult<T> = Result<T, ThresholdError>;

/// An ordered list of tiers, ascending by minimum order total once normalized.
pub type ThresholdList = Vec<ThresholdTuple>;

// =============================================================================
// Threshold Tuple
// =============================================================================

/// One discount tier: `(percentage, minimum order total)`.
///
/// Serialized as a two element JSON array, `[10, 600]` meaning "10% off for
/// orders of 600 or more".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThresholdTuple(pub f64, pub f64);

impl ThresholdTuple {
    /// Creates a tier without clamping.
    #[inline]
    pub const fn new(percentage: f64, minimum_order_total: f64) -> Self {
        ThresholdTuple(percentage, minimum_order_total)
    }

    /// Discount percentage for this tier.
    #[inline]
    pub const fn percentage(&self) -> f64 {
        self.0
    }

    /// Smallest subtotal that qualifies for this tier.
    #[inline]
    pub const fn minimum_order_total(&self) -> f64 {
        self.1
    }

    /// Returns the tier with percentage in `[0, 100]` and minimum in `[0, ∞)`.
    ///
    /// Negative zero becomes zero so equal minimums sort as ties.
    pub fn clamped(&self) -> Self {
        let percentage = if self.0 <= 0.0 {
            0.0
        } else if self.0 > 100.0 {
            100.0
        } else {
            self.0
        };
        let minimum = if self.1 <= 0.0 { 0.0 } else { self.1 };
        ThresholdTuple(percentage, minimum)
    }

    /// Both components are finite.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Validates, clamps and sorts a raw threshold list.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_core::thresholds::{normalize_thresholds, ThresholdTuple};
///
/// let list = normalize_thresholds(&json!("[[10, 600], [150, -5]]")).unwrap();
/// assert_eq!(list, vec![ThresholdTuple(100.0, 0.0), ThresholdTuple(10.0, 600.0)]);
///
/// assert!(normalize_thresholds(&json!("not json")).is_err());
/// assert!(normalize_thresholds(&json!("  ")).unwrap().is_empty());
/// ```
pub fn normalize_thresholds(input: &Value) -> ThresholdResult<ThresholdList> {
    let parsed;
    let value = match input {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Vec::new());
            }
            parsed = serde_json::from_str::<Value>(trimmed)
                .map_err(|e| ThresholdError::Unparsable(e.to_string()))?;
            &parsed
        }
        other => other,
    };

    let items = value.as_array().ok_or(ThresholdError::NotAList)?;

    let tuples = items
        .iter()
        .enumerate()
        .map(|(index, item)| read_tuple(index, item))
        .collect::<ThresholdResult<Vec<_>>>()?;

    Ok(sort_clamped(tuples))
}

/// Re-normalizes an already typed list.
///
/// Used by the evaluator on canonical configs that may have been built by hand
/// or decoded from storage without going through [`normalize_thresholds`].
pub fn normalize_threshold_list(list: &[ThresholdTuple]) -> ThresholdResult<ThresholdList> {
    if let Some(index) = list.iter().position(|t| !t.is_finite()) {
        return Err(ThresholdError::NonNumeric { index });
    }

    Ok(sort_clamped(list.to_vec()))
}

/// Picks the percentage for a subtotal: the highest tier whose minimum the
/// subtotal reaches, or `0` when none does (or the subtotal is not a number).
///
/// Expects a list sorted ascending by minimum.
pub fn percentage_for_subtotal(thresholds: &[ThresholdTuple], subtotal: f64) -> f64 {
    if subtotal.is_nan() {
        return 0.0;
    }

    thresholds
        .iter()
        .rev()
        .find(|tier| subtotal >= tier.minimum_order_total())
        .map(ThresholdTuple::percentage)
        .unwrap_or(0.0)
}

fn read_tuple(index: usize, item: &Value) -> ThresholdResult<ThresholdTuple> {
    let pair = match item.as_array() {
        Some(pair) if pair.len() == 2 => pair,
        _ => return Err(ThresholdError::MalformedTuple { index }),
    };

    let percentage = coerce_number(&pair[0]).ok_or(ThresholdError::NonNumeric { index })?;
    let minimum = coerce_number(&pair[1]).ok_or(ThresholdError::NonNumeric { index })?;

    Ok(ThresholdTuple(percentage, minimum))
}

fn sort_clamped(tuples: Vec<ThresholdTuple>) -> ThresholdList {
    let mut list: ThresholdList = tuples.iter().map(ThresholdTuple::clamped).collect();
    // sort_by is stable: equal minimums keep their input order
    list.sort_by(|a, b| a.1.total_cmp(&b.1));
    list
}

// =============================================================================
// Unit Tests
// =============================================================================
