//! # CLI Commands
//!
//! Handlers behind the `tally-function` subcommands. Each takes the input text
//! and returns what should be printed, so they can be tested without a
//! process.
//!
//! ```text
//! run <kind>         function input JSON  ──► function result JSON
//! validate <kind>    raw config JSON      ──► canonical config | errors
//! thresholds         threshold text       ──► admin pretty layout
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use tally_core::display::format_thresholds;
use tally_core::thresholds::normalize_thresholds;
use tally_core::validation::{validate_shipping_config, validate_tiered_config};
use tally_core::{ThresholdError, ValidationErrors};
use tracing::debug;

use crate::error::RunnerResult;
use crate::run::{run_order_discount, run_shipping_discount};
use crate::wire::{FunctionInput, FunctionRunResult};

/// Which discount function / config family a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiscountKind {
    /// Tiered order-level discount
    Order,
    /// Flat shipping discount
    Shipping,
}

/// Reads the whole input from a file, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> RunnerResult<String> {
    let text = match path {
        Some(path) => {
            debug!(path = %path.display(), "reading input file");
            fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(text)
}

/// Serializes a value for stdout.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> RunnerResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// `run`: evaluates a function input.
pub fn run(kind: DiscountKind, input: &str) -> RunnerResult<FunctionRunResult> {
    let input: FunctionInput = serde_json::from_str(input)?;
    let result = match kind {
        DiscountKind::Order => run_order_discount(&input),
        DiscountKind::Shipping => run_shipping_discount(&input),
    };
    Ok(result)
}

/// `validate`: validates a raw configuration document.
///
/// The outer `Result` fails only when the input is not JSON; the inner one
/// carries the validator's verdict, with the canonical config as JSON.
pub fn validate(
    kind: DiscountKind,
    input: &str,
    prefix: Option<&str>,
) -> RunnerResult<Result<Value, ValidationErrors>> {
    let raw: Value = serde_json::from_str(input)?;
    let verdict = match kind {
        DiscountKind::Order => validate_tiered_config(&raw, prefix).map(|c| serde_json::to_value(c)),
        DiscountKind::Shipping => {
            validate_shipping_config(&raw, prefix).map(|c| serde_json::to_value(c))
        }
    };

    match verdict {
        Ok(config) => Ok(Ok(config?)),
        Err(errors) => Ok(Err(errors)),
    }
}

/// `thresholds`: normalizes threshold text and renders it for the admin form.
pub fn thresholds(input: &str) -> Result<String, ThresholdError> {
    let list = normalize_thresholds(&Value::String(input.to_string()))?;
    Ok(format_thresholds(&list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_non_json() {
        assert!(run(DiscountKind::Order, "not json").is_err());
    }

    #[test]
    fn test_validate_outcomes() {
        let ok = validate(
            DiscountKind::Order,
            r#"{ "title": "B2B", "thresholds": "[[10, 600], [5, 0]]" }"#,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(ok["thresholds"], serde_json::json!([[5.0, 0.0], [10.0, 600.0]]));

        let errors = validate(
            DiscountKind::Shipping,
            r#"{ "discount_type": "bogo", "discount_value": -1, "customer_tags_type": "include" }"#,
            Some("configuration"),
        )
        .unwrap()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors[0].path(), "configuration.discount_value");
    }

    #[test]
    fn test_thresholds_command() {
        assert_eq!(
            thresholds("[[10, 600], [5, -3]]").unwrap(),
            "[\n  [5, 0],\n  [10, 600]\n]"
        );
        assert!(thresholds("[[10]]").is_err());
    }

    #[test]
    fn test_to_json() {
        let value = serde_json::json!({ "a": 1 });
        assert_eq!(to_json(&value, false).unwrap(), r#"{"a":1}"#);
        assert!(to_json(&value, true).unwrap().contains('\n'));
    }
}
