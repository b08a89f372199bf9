//! # Discount Function Runs
//!
//! One call per checkout: decode the stored configuration, evaluate, encode.
//! A missing or unreadable configuration returns an empty result, never an
//! error, so checkout is not blocked by a broken discount.

use serde::de::DeserializeOwned;
use tally_core::evaluate::{evaluate_shipping, evaluate_tiered};
use tally_core::types::{DiscountDecision, ShippingDiscountConfig, TieredDiscountConfig};
use tracing::{debug, warn};

use crate::wire::{FunctionInput, FunctionRunResult};

/// Runs the tiered order discount function.
pub fn run_order_discount(input: &FunctionInput) -> FunctionRunResult {
    let decision = match stored_config::<TieredDiscountConfig>(input) {
        Some(config) => evaluate_tiered(&config, &input.cart_snapshot()),
        None => DiscountDecision::NoDiscount,
    };

    debug!(applied = decision.is_applied(), "order discount evaluated");
    FunctionRunResult::order(&decision)
}

/// Runs the shipping discount function.
pub fn run_shipping_discount(input: &FunctionInput) -> FunctionRunResult {
    let decision = match stored_config::<ShippingDiscountConfig>(input) {
        Some(config) => evaluate_shipping(&config, &input.cart_snapshot()),
        None => DiscountDecision::NoDiscount,
    };

    debug!(applied = decision.is_applied(), "shipping discount evaluated");
    FunctionRunResult::shipping(&decision)
}

/// Decodes the configuration stored on the discount node.
fn stored_config<T: DeserializeOwned>(input: &FunctionInput) -> Option<T> {
    let Some(raw) = input.configuration() else {
        warn!("discount node has no configuration");
        return None;
    };

    match serde_json::from_str::<T>(raw) {
        Ok(config) => Some(config),
        Err(error) => {
            warn!(%error, "stored discount configuration is unreadable");
            None
        }
    }
}
