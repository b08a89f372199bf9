//! # Discount Evaluation
//!
//! Decides what discount applies to a cart. Both evaluators are pure: the same
//! config and cart always produce the same [`DiscountDecision`].
//!
//! ## Tiered (order-level) Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customer? ─────────────────────── no ──► NoDiscount                   │
//! │      │                                                                  │
//! │  customer tags required & not eligible ──► NoDiscount                  │
//! │      │                                                                  │
//! │  thresholds re-normalized; empty/invalid ─► NoDiscount                 │
//! │      │                                                                  │
//! │  every line excluded ──────────────────► NoDiscount                    │
//! │      │                                                                  │
//! │  highest tier with minimum <= subtotal (else 0%)                       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Applied { "Title (10%)", subtotal minus excluded variants, 10% }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shipping (flat) Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discount type/value in range? ───── no ──► NoDiscount                 │
//! │  customer? (guests never qualify) ── no ──► NoDiscount                 │
//! │  include: tags set & customer tagged? ─ no ► NoDiscount                │
//! │  exclude: customer tagged? ───────── yes ─► NoDiscount                 │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Applied { title [+ " (5%)"], every delivery group, fixed | percent }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::number::format_number;
use crate::thresholds::{normalize_threshold_list, percentage_for_subtotal};
use crate::types::{
    AppliedDiscount, CartSnapshot, CustomerTagsType, DiscountDecision, DiscountTargets,
    DiscountType, DiscountValue, ShippingDiscountConfig, TieredDiscountConfig,
};

/// Guests are never served by shipping discounts, whatever `allow_guest` says.
const SHIPPING_ALLOWS_GUESTS: bool = false;

// =============================================================================
// Tiered Discount
// =============================================================================

/// Evaluates a tiered order discount.
///
/// ## Example
/// ```rust
/// use tally_core::evaluate::evaluate_tiered;
/// use tally_core::thresholds::ThresholdTuple;
/// use tally_core::types::*;
///
/// let config = TieredDiscountConfig {
///     title: "B2B".to_string(),
///     thresholds: vec![ThresholdTuple(5.0, 0.0), ThresholdTuple(10.0, 600.0)],
///     ..Default::default()
/// };
/// let cart = CartSnapshot {
///     subtotal: 700.0,
///     lines: vec![CartLine { merchandise: Merchandise::Other }],
///     customer: Some(Customer::default()),
///     delivery_groups: vec![],
/// };
///
/// let applied = evaluate_tiered(&config, &cart);
/// let applied = applied.applied().unwrap();
/// assert_eq!(applied.message.as_deref(), Some("B2B (10%)"));
/// assert_eq!(applied.value, DiscountValue::Percentage(10.0));
/// ```
pub fn evaluate_tiered(config: &TieredDiscountConfig, cart: &CartSnapshot) -> DiscountDecision {
    let Some(customer) = cart.customer else {
        debug!("tiered discount skipped: no customer");
        return DiscountDecision::NoDiscount;
    };

    if !config.ensure_any_customer_tags.is_empty() && !customer.can_use_discount {
        debug!("tiered discount skipped: customer lacks a required tag");
        return DiscountDecision::NoDiscount;
    }

    let thresholds = match normalize_threshold_list(&config.thresholds) {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => {
            debug!("tiered discount skipped: no tiers configured");
            return DiscountDecision::NoDiscount;
        }
        Err(reason) => {
            debug!(%reason, "tiered discount skipped: invalid tiers");
            return DiscountDecision::NoDiscount;
        }
    };

    let excluded_variant_ids: Vec<String> = cart
        .lines
        .iter()
        .filter_map(|line| line.excluded_variant_id())
        .map(str::to_string)
        .collect();

    // An empty cart counts as "everything excluded".
    if excluded_variant_ids.len() == cart.lines.len() {
        debug!(
            lines = cart.lines.len(),
            "tiered discount skipped: every line is excluded"
        );
        return DiscountDecision::NoDiscount;
    }

    let percentage = percentage_for_subtotal(&thresholds, cart.subtotal);

    let message = (!config.title.is_empty())
        .then(|| format!("{} ({}%)", config.title, format_number(percentage)));

    DiscountDecision::Applied(AppliedDiscount {
        message,
        targets: DiscountTargets::OrderSubtotal {
            excluded_variant_ids,
        },
        value: DiscountValue::Percentage(percentage),
    })
}

// =============================================================================
// Shipping Discount
// =============================================================================

/// Evaluates a flat shipping discount.
///
/// Every delivery group in the cart is targeted.
pub fn evaluate_shipping(config: &ShippingDiscountConfig, cart: &CartSnapshot) -> DiscountDecision {
    let Some(value) = shipping_value(config) else {
        debug!(
            discount_type = ?config.discount_type,
            discount_value = config.discount_value,
            "shipping discount skipped: value out of range"
        );
        return DiscountDecision::NoDiscount;
    };

    if !SHIPPING_ALLOWS_GUESTS && cart.customer.is_none() {
        debug!("shipping discount skipped: no customer");
        return DiscountDecision::NoDiscount;
    }

    let has_tag = cart.customer.is_some_and(|c| c.has_tag);
    let qualifies = match config.customer_tags_type {
        CustomerTagsType::Include => {
            cart.customer.is_some() && !config.customer_tags.is_empty() && has_tag
        }
        CustomerTagsType::Exclude => !has_tag,
        CustomerTagsType::Unknown => false,
    };
    if !qualifies {
        debug!(
            mode = ?config.customer_tags_type,
            "shipping discount skipped: customer tag rule not met"
        );
        return DiscountDecision::NoDiscount;
    }

    let message = (!config.title.is_empty()).then(|| match value {
        DiscountValue::Percentage(pct) => format!("{} ({}%)", config.title, format_number(pct)),
        DiscountValue::FixedAmount(_) => config.title.clone(),
    });

    DiscountDecision::Applied(AppliedDiscount {
        message,
        targets: DiscountTargets::DeliveryGroups {
            ids: cart.delivery_groups.iter().map(|g| g.id.clone()).collect(),
        },
        value,
    })
}

/// Range-checks the configured value; `None` if it must not be applied.
fn shipping_value(config: &ShippingDiscountConfig) -> Option<DiscountValue> {
    let value = config.discount_value;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    match config.discount_type {
        DiscountType::Fixed => Some(DiscountValue::FixedAmount(value)),
        DiscountType::Percentage if value <= 100.0 => Some(DiscountValue::Percentage(value)),
        DiscountType::Percentage | DiscountType::Unknown => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::ThresholdTuple;
    use crate::types::{CartLine, Customer, DeliveryGroup, Merchandise};

    fn tiered() -> TieredDiscountConfig {
        TieredDiscountConfig {
            title: "B2B".to_string(),
            thresholds: vec![
                ThresholdTuple(5.0, 0.0),
                ThresholdTuple(10.0, 600.0),
                ThresholdTuple(15.0, 1500.0),
                ThresholdTuple(20.0, 2500.0),
                ThresholdTuple(25.0, 5000.0),
            ],
            ensure_any_customer_tags: vec![],
            excluded_product_tags: vec!["accessory".to_string()],
        }
    }

    fn shipping(tags_type: CustomerTagsType) -> ShippingDiscountConfig {
        ShippingDiscountConfig {
            title: "Shipping".to_string(),
            allow_guest: Some(true),
            customer_tags_type: tags_type,
            customer_tags: vec!["wholesale".to_string()],
            discount_value: 5.0,
            discount_type: DiscountType::Fixed,
            discount_message: None,
        }
    }

    fn variant(id: &str, excluded: bool) -> CartLine {
        CartLine {
            merchandise: Merchandise::ProductVariant {
                id: id.to_string(),
                excluded_from_discount: excluded,
            },
        }
    }

    fn cart(subtotal: f64, customer: Option<Customer>) -> CartSnapshot {
        CartSnapshot {
            subtotal,
            lines: vec![variant("v1", false), variant("v2", true)],
            customer,
            delivery_groups: vec![
                DeliveryGroup { id: "g1".to_string() },
                DeliveryGroup { id: "g2".to_string() },
            ],
        }
    }

    fn customer(has_tag: bool) -> Option<Customer> {
        Some(Customer {
            has_tag,
            can_use_discount: has_tag,
        })
    }

    fn percentage(decision: &DiscountDecision) -> f64 {
        match decision.applied().map(|a| a.value) {
            Some(DiscountValue::Percentage(p)) => p,
            other => panic!("expected a percentage, got {other:?}"),
        }
    }

    #[test]
    fn test_tiered_picks_highest_qualifying_tier() {
        let config = tiered();
        assert_eq!(percentage(&evaluate_tiered(&config, &cart(700.0, customer(false)))), 10.0);
        assert_eq!(percentage(&evaluate_tiered(&config, &cart(0.0, customer(false)))), 5.0);
        assert_eq!(percentage(&evaluate_tiered(&config, &cart(5000.0, customer(false)))), 25.0);
    }

    #[test]
    fn test_tiered_negative_subtotal_applies_zero() {
        let decision = evaluate_tiered(&tiered(), &cart(-1.0, customer(false)));
        assert_eq!(percentage(&decision), 0.0);
        assert_eq!(
            decision.applied().unwrap().message.as_deref(),
            Some("B2B (0%)")
        );
    }

    #[test]
    fn test_tiered_targets_exclude_flagged_variants() {
        let decision = evaluate_tiered(&tiered(), &cart(700.0, customer(false)));
        let applied = decision.applied().unwrap();
        assert_eq!(applied.message.as_deref(), Some("B2B (10%)"));
        assert_eq!(
            applied.targets,
            DiscountTargets::OrderSubtotal {
                excluded_variant_ids: vec!["v2".to_string()]
            }
        );
    }

    #[test]
    fn test_tiered_requires_customer() {
        assert_eq!(
            evaluate_tiered(&tiered(), &cart(700.0, None)),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn test_tiered_customer_tag_gate() {
        let mut config = tiered();
        config.ensure_any_customer_tags = vec!["b2b".to_string()];
        assert_eq!(
            evaluate_tiered(&config, &cart(700.0, customer(false))),
            DiscountDecision::NoDiscount
        );
        assert!(evaluate_tiered(&config, &cart(700.0, customer(true))).is_applied());
    }

    #[test]
    fn test_tiered_all_excluded_cart() {
        let mut cart = cart(10_000.0, customer(true));
        cart.lines = vec![variant("v1", true), variant("v2", true)];
        assert_eq!(evaluate_tiered(&tiered(), &cart), DiscountDecision::NoDiscount);

        cart.lines.clear();
        assert_eq!(evaluate_tiered(&tiered(), &cart), DiscountDecision::NoDiscount);

        cart.lines.push(CartLine {
            merchandise: Merchandise::Other,
        });
        assert!(evaluate_tiered(&tiered(), &cart).is_applied());
    }

    #[test]
    fn test_tiered_empty_or_invalid_thresholds() {
        let mut config = tiered();
        config.thresholds.clear();
        assert_eq!(
            evaluate_tiered(&config, &cart(700.0, customer(true))),
            DiscountDecision::NoDiscount
        );

        config.thresholds = vec![ThresholdTuple(10.0, f64::INFINITY)];
        assert_eq!(
            evaluate_tiered(&config, &cart(700.0, customer(true))),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn test_tiered_repairs_unsorted_unclamped_tiers() {
        let mut config = tiered();
        config.thresholds = vec![ThresholdTuple(150.0, 1000.0), ThresholdTuple(5.0, -20.0)];
        assert_eq!(percentage(&evaluate_tiered(&config, &cart(1200.0, customer(true)))), 100.0);
        assert_eq!(percentage(&evaluate_tiered(&config, &cart(999.0, customer(true)))), 5.0);
    }

    #[test]
    fn test_tiered_without_title_has_no_message() {
        let mut config = tiered();
        config.title.clear();
        let decision = evaluate_tiered(&config, &cart(700.0, customer(true)));
        assert_eq!(decision.applied().unwrap().message, None);
    }

    #[test]
    fn test_tiered_nan_subtotal() {
        let decision = evaluate_tiered(&tiered(), &cart(f64::NAN, customer(true)));
        assert_eq!(percentage(&decision), 0.0);
    }

    #[test]
    fn test_shipping_exclude_mode() {
        let config = shipping(CustomerTagsType::Exclude);
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(true))),
            DiscountDecision::NoDiscount
        );

        let decision = evaluate_shipping(&config, &cart(50.0, customer(false)));
        let applied = decision.applied().unwrap();
        assert_eq!(applied.message.as_deref(), Some("Shipping"));
        assert_eq!(applied.value, DiscountValue::FixedAmount(5.0));
        assert_eq!(
            applied.targets,
            DiscountTargets::DeliveryGroups {
                ids: vec!["g1".to_string(), "g2".to_string()]
            }
        );
    }

    #[test]
    fn test_shipping_include_mode() {
        let mut config = shipping(CustomerTagsType::Include);
        assert!(evaluate_shipping(&config, &cart(50.0, customer(true))).is_applied());
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );

        config.customer_tags.clear();
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(true))),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn test_shipping_never_serves_guests() {
        for mode in [
            CustomerTagsType::Include,
            CustomerTagsType::Exclude,
            CustomerTagsType::Unknown,
        ] {
            let config = shipping(mode);
            assert_eq!(config.allow_guest, Some(true));
            assert_eq!(
                evaluate_shipping(&config, &cart(50.0, None)),
                DiscountDecision::NoDiscount
            );
        }
    }

    #[test]
    fn test_shipping_unknown_mode() {
        let config = shipping(CustomerTagsType::Unknown);
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn test_shipping_percentage_message() {
        let mut config = shipping(CustomerTagsType::Exclude);
        config.discount_type = DiscountType::Percentage;
        config.discount_value = 12.5;
        let decision = evaluate_shipping(&config, &cart(50.0, customer(false)));
        let applied = decision.applied().unwrap();
        assert_eq!(applied.message.as_deref(), Some("Shipping (12.5%)"));
        assert_eq!(applied.value, DiscountValue::Percentage(12.5));
    }

    #[test]
    fn test_shipping_percentage_without_title_has_no_message() {
        let mut config = shipping(CustomerTagsType::Exclude);
        config.title.clear();
        config.discount_type = DiscountType::Percentage;
        config.discount_value = 20.0;
        let decision = evaluate_shipping(&config, &cart(50.0, customer(false)));
        let applied = decision.applied().unwrap();
        assert_eq!(applied.message, None);
        assert_eq!(applied.value, DiscountValue::Percentage(20.0));
    }

    #[test]
    fn test_shipping_rejects_out_of_range_values() {
        let mut config = shipping(CustomerTagsType::Exclude);
        config.discount_value = -1.0;
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );

        config.discount_value = 101.0;
        config.discount_type = DiscountType::Percentage;
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );

        config.discount_type = DiscountType::Fixed;
        assert!(evaluate_shipping(&config, &cart(50.0, customer(false))).is_applied());

        config.discount_type = DiscountType::Unknown;
        config.discount_value = 5.0;
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );

        config.discount_type = DiscountType::Fixed;
        config.discount_value = f64::NAN;
        assert_eq!(
            evaluate_shipping(&config, &cart(50.0, customer(false))),
            DiscountDecision::NoDiscount
        );
    }

    #[test]
    fn test_shipping_without_delivery_groups() {
        let config = shipping(CustomerTagsType::Exclude);
        let mut cart = cart(50.0, customer(false));
        cart.delivery_groups.clear();
        let decision = evaluate_shipping(&config, &cart);
        assert_eq!(
            decision.applied().unwrap().targets,
            DiscountTargets::DeliveryGroups { ids: vec![] }
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let config = tiered();
        let cart = cart(1600.0, customer(true));
        let first = serde_json::to_string(&evaluate_tiered(&config, &cart)).unwrap();
        let second = serde_json::to_string(&evaluate_tiered(&config, &cart)).unwrap();
        assert_eq!(first, second);
    }
}
