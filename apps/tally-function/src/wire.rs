//! # Wire Types
//!
//! The JSON the pricing system sends to a discount function, and the JSON it
//! expects back.
//!
//! ## Input → Core Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FunctionInput                          tally-core                      │
//! │  ─────────────                          ──────────                      │
//! │  cart.cost.subtotalAmount.amount  ───►  CartSnapshot.subtotal (f64)     │
//! │  cart.lines[].merchandise         ───►  CartLine { Merchandise }        │
//! │    __typename = ProductVariant          ProductVariant { id, excluded } │
//! │    anything else                        Other                           │
//! │  cart.buyerIdentity.customer      ───►  Option<Customer>                │
//! │    _hasTag / _canUseDiscount            has_tag / can_use_discount      │
//! │  cart.deliveryGroups[].id         ───►  DeliveryGroup { id }            │
//! │  discountNode.metafield.value     ───►  stored config JSON (string)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields prefixed with `_` are aliases computed by the function's input
//! query (tag lookups), not by this crate.

use serde::{Deserialize, Deserializer, Serialize};
use tally_core::number::parse_number;
use tally_core::types::{
    AppliedDiscount, CartLine, CartSnapshot, Customer, DeliveryGroup, DiscountDecision,
    DiscountTargets, DiscountValue, Merchandise,
};

// =============================================================================
// Function Input
// =============================================================================

/// The document a discount function receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    #[serde(default)]
    pub cart: CartInput,

    #[serde(default)]
    pub discount_node: Option<DiscountNode>,
}

impl FunctionInput {
    /// Converts the wire cart into the evaluator's snapshot.
    pub fn cart_snapshot(&self) -> CartSnapshot {
        let cart = &self.cart;
        CartSnapshot {
            subtotal: cart
                .cost
                .as_ref()
                .map(|c| c.subtotal_amount.amount)
                .unwrap_or(f64::NAN),
            lines: cart.lines.iter().map(CartLineInput::to_core).collect(),
            customer: cart
                .buyer_identity
                .as_ref()
                .and_then(|b| b.customer.as_ref())
                .map(|c| Customer {
                    has_tag: c.has_tag,
                    can_use_discount: c.can_use_discount,
                }),
            delivery_groups: cart
                .delivery_groups
                .iter()
                .map(|g| DeliveryGroup { id: g.id.clone() })
                .collect(),
        }
    }

    /// The stored discount configuration (a JSON string), if any.
    pub fn configuration(&self) -> Option<&str> {
        self.discount_node
            .as_ref()
            .and_then(|n| n.metafield.as_ref())
            .map(|m| m.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    #[serde(default)]
    pub buyer_identity: Option<BuyerIdentity>,

    #[serde(default)]
    pub lines: Vec<CartLineInput>,

    #[serde(default)]
    pub cost: Option<CartCost>,

    #[serde(default)]
    pub delivery_groups: Vec<DeliveryGroupInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerIdentity {
    #[serde(default)]
    pub customer: Option<CustomerInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(rename = "_hasTag", default)]
    pub has_tag: bool,

    #[serde(rename = "_canUseDiscount", default)]
    pub can_use_discount: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineInput {
    pub merchandise: MerchandiseInput,
}

impl CartLineInput {
    fn to_core(&self) -> CartLine {
        let merchandise = match &self.merchandise {
            MerchandiseInput::ProductVariant { id, product } => Merchandise::ProductVariant {
                id: id.clone(),
                excluded_from_discount: product.excluded_from_discount,
            },
            MerchandiseInput::Other => Merchandise::Other,
        };
        CartLine { merchandise }
    }
}

/// Line merchandise, discriminated by the GraphQL `__typename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum MerchandiseInput {
    ProductVariant {
        id: String,
        #[serde(default)]
        product: ProductInput,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "_excludedFromDiscount", default)]
    pub excluded_from_discount: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: MoneyInput,
}

/// A money amount: a decimal string (`"700.0"`) or a JSON number.
/// Anything unreadable becomes NaN, which qualifies for no tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyInput {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryGroupInput {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountNode {
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    pub value: String,
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Number(n) => n,
        Amount::Text(s) => parse_number(&s).unwrap_or(f64::NAN),
        Amount::Other(_) => f64::NAN,
    })
}

// =============================================================================
// Function Result
// =============================================================================

/// The document a discount function returns.
///
/// ```json
/// {
///   "discountApplicationStrategy": "FIRST",
///   "discounts": [{
///     "message": "B2B (10%)",
///     "targets": [{ "orderSubtotal": { "excludedVariantIds": [] } }],
///     "value": { "percentage": { "value": 10.0 } }
///   }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRunResult {
    /// Present on order discounts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_application_strategy: Option<DiscountApplicationStrategy>,

    /// Empty when no discount applies.
    pub discounts: Vec<Discount>,
}

impl FunctionRunResult {
    /// Encodes an order (tiered) decision.
    pub fn order(decision: &DiscountDecision) -> Self {
        FunctionRunResult {
            discount_application_strategy: Some(DiscountApplicationStrategy::First),
            discounts: Discount::from_decision(decision),
        }
    }

    /// Encodes a shipping decision.
    pub fn shipping(decision: &DiscountDecision) -> Self {
        FunctionRunResult {
            discount_application_strategy: None,
            discounts: Discount::from_decision(decision),
        }
    }

    /// True when no discount is returned.
    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

/// Which discount wins when several are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountApplicationStrategy {
    First,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub targets: Vec<Target>,
    pub value: Value,
}

impl Discount {
    fn from_decision(decision: &DiscountDecision) -> Vec<Discount> {
        decision
            .applied()
            .map(Discount::from_applied)
            .into_iter()
            .collect()
    }

    fn from_applied(applied: &AppliedDiscount) -> Discount {
        let targets = match &applied.targets {
            DiscountTargets::OrderSubtotal {
                excluded_variant_ids,
            } => vec![Target::OrderSubtotal {
                excluded_variant_ids: excluded_variant_ids.clone(),
            }],
            DiscountTargets::DeliveryGroups { ids } => ids
                .iter()
                .map(|id| Target::DeliveryGroup { id: id.clone() })
                .collect(),
        };

        let value = match applied.value {
            DiscountValue::Percentage(value) => Value::Percentage { value },
            DiscountValue::FixedAmount(amount) => Value::FixedAmount { amount },
        };

        Discount {
            message: applied.message.clone(),
            targets,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    #[serde(rename_all = "camelCase")]
    OrderSubtotal { excluded_variant_ids: Vec<String> },
    DeliveryGroup { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Percentage { value: f64 },
    FixedAmount { amount: f64 },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> FunctionInput {
        serde_json::from_value(json!({
            "cart": {
                "buyerIdentity": { "customer": { "_hasTag": true } },
                "lines": [
                    { "merchandise": {
                        "__typename": "ProductVariant",
                        "id": "gid://shop/ProductVariant/1",
                        "product": { "_excludedFromDiscount": true }
                    } },
                    { "merchandise": { "__typename": "CustomProduct" } }
                ],
                "cost": { "subtotalAmount": { "amount": "700.50" } },
                "deliveryGroups": [{ "id": "gid://shop/DeliveryGroup/1" }]
            },
            "discountNode": { "metafield": { "value": "{}" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_cart_snapshot_conversion() {
        let cart = input().cart_snapshot();
        assert_eq!(cart.subtotal, 700.5);
        assert_eq!(
            cart.customer,
            Some(Customer {
                has_tag: true,
                can_use_discount: false
            })
        );
        assert_eq!(
            cart.lines[0].excluded_variant_id(),
            Some("gid://shop/ProductVariant/1")
        );
        assert_eq!(cart.lines[1].merchandise, Merchandise::Other);
        assert_eq!(cart.delivery_groups[0].id, "gid://shop/DeliveryGroup/1");
    }

    #[test]
    fn test_configuration_lookup() {
        assert_eq!(input().configuration(), Some("{}"));
        assert_eq!(FunctionInput::default().configuration(), None);
    }

    #[test]
    fn test_amount_forms() {
        let numeric: MoneyInput = serde_json::from_value(json!({ "amount": 12.5 })).unwrap();
        assert_eq!(numeric.amount, 12.5);

        let text: MoneyInput = serde_json::from_value(json!({ "amount": "oops" })).unwrap();
        assert!(text.amount.is_nan());

        let odd: MoneyInput = serde_json::from_value(json!({ "amount": [1] })).unwrap();
        assert!(odd.amount.is_nan());
    }

    #[test]
    fn test_missing_cost_is_nan() {
        assert!(FunctionInput::default().cart_snapshot().subtotal.is_nan());
    }

    #[test]
    fn test_order_result_shape() {
        let decision = DiscountDecision::Applied(AppliedDiscount {
            message: Some("B2B (10%)".to_string()),
            targets: DiscountTargets::OrderSubtotal {
                excluded_variant_ids: vec!["v1".to_string()],
            },
            value: DiscountValue::Percentage(10.0),
        });
        let json = serde_json::to_value(FunctionRunResult::order(&decision)).unwrap();
        assert_eq!(
            json,
            json!({
                "discountApplicationStrategy": "FIRST",
                "discounts": [{
                    "message": "B2B (10%)",
                    "targets": [{ "orderSubtotal": { "excludedVariantIds": ["v1"] } }],
                    "value": { "percentage": { "value": 10.0 } }
                }]
            })
        );
    }

    #[test]
    fn test_shipping_result_shape() {
        let decision = DiscountDecision::Applied(AppliedDiscount {
            message: None,
            targets: DiscountTargets::DeliveryGroups {
                ids: vec!["g1".to_string(), "g2".to_string()],
            },
            value: DiscountValue::FixedAmount(5.0),
        });
        let json = serde_json::to_value(FunctionRunResult::shipping(&decision)).unwrap();
        assert_eq!(
            json,
            json!({
                "discounts": [{
                    "targets": [
                        { "deliveryGroup": { "id": "g1" } },
                        { "deliveryGroup": { "id": "g2" } }
                    ],
                    "value": { "fixedAmount": { "amount": 5.0 } }
                }]
            })
        );
    }

    #[test]
    fn test_empty_results() {
        let order = serde_json::to_value(FunctionRunResult::order(&DiscountDecision::NoDiscount))
            .unwrap();
        assert_eq!(
            order,
            json!({ "discountApplicationStrategy": "FIRST", "discounts": [] })
        );

        let shipping = FunctionRunResult::shipping(&DiscountDecision::NoDiscount);
        assert!(shipping.is_empty());
        assert_eq!(serde_json::to_value(shipping).unwrap(), json!({ "discounts": [] }));
    }
}
