//! # Admin Display Helpers
//!
//! Renders canonical values back into the text the admin form fields edit.
//! Whatever these produce, the validator accepts and maps back to the same
//! value.

use crate::number::format_number;
use crate::thresholds::ThresholdTuple;

/// Renders tiers one per line for the thresholds text area.
///
/// ## Example
/// ```rust
/// use tally_core::display::format_thresholds;
/// use tally_core::thresholds::ThresholdTuple;
///
/// let text = format_thresholds(&[ThresholdTuple(5.0, 0.0), ThresholdTuple(12.5, 600.0)]);
/// assert_eq!(text, "[\n  [5, 0],\n  [12.5, 600]\n]");
/// ```
pub fn format_thresholds(thresholds: &[ThresholdTuple]) -> String {
    let rows: Vec<String> = thresholds
        .iter()
        .map(|t| {
            format!(
                "  [{}, {}]",
                format_number(t.percentage()),
                format_number(t.minimum_order_total())
            )
        })
        .collect();

    format!("[\n{}\n]", rows.join(",\n"))
}

/// Joins tags for a comma separated text field.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
