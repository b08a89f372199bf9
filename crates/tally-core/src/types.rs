//! # Domain Types
//!
//! Canonical configurations, the cart snapshot, and the discount decision.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Canonical configs (validator output, evaluator input)                 │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐           │
//! │  │  TieredDiscountConfig    │   │  ShippingDiscountConfig  │           │
//! │  │  ──────────────────────  │   │  ──────────────────────  │           │
//! │  │  title                   │   │  title, allow_guest      │           │
//! │  │  thresholds              │   │  customer_tags_type      │           │
//! │  │  ensureAnyCustomerTags   │   │  customer_tags           │           │
//! │  │  excludedProductTags     │   │  discount_value/_type    │           │
//! │  └──────────────────────────┘   └──────────────────────────┘           │
//! │                                                                         │
//! │  Evaluator input              Evaluator output                         │
//! │  ┌──────────────────────┐     ┌──────────────────────────────┐         │
//! │  │  CartSnapshot        │     │  DiscountDecision            │         │
//! │  │  subtotal, lines     │ ──► │  NoDiscount                  │         │
//! │  │  customer            │     │  Applied { message, targets, │         │
//! │  │  delivery_groups     │     │            value }           │         │
//! │  └──────────────────────┘     └──────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Shape
//! Canonical configs serialize to exactly the JSON stored with the discount.
//! Decoding is lenient: missing fields take defaults, unknown enum values
//! become `Unknown` and unreadable values fall back to something the
//! evaluators refuse to apply. A bad value in one field never fails the whole
//! decode.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::thresholds::ThresholdList;

// =============================================================================
// Tiered (order-level) Configuration
// =============================================================================

/// Canonical configuration of a tiered order discount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct TieredDiscountConfig {
    /// Prefix of the checkout message; empty means no message.
    #[serde(deserialize_with = "stored::string")]
    pub title: String,

    /// Tiers, ascending by minimum order total.
    #[serde(deserialize_with = "stored::thresholds")]
    pub thresholds: ThresholdList,

    /// When non-empty, only customers carrying one of these tags qualify.
    #[serde(deserialize_with = "stored::tags")]
    pub ensure_any_customer_tags: Vec<String>,

    /// Products carrying one of these tags are excluded from the discount.
    #[serde(deserialize_with = "stored::tags")]
    pub excluded_product_tags: Vec<String>,
}

// =============================================================================
// Shipping (flat) Configuration
// =============================================================================

/// How `customer_tags` gate a shipping discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTagsType {
    /// Only customers carrying a tag qualify.
    Include,
    /// Customers carrying a tag are excluded.
    Exclude,
    /// Anything else found in storage.
    #[default]
    #[serde(other)]
    #[ts(skip)]
    Unknown,
}

impl CustomerTagsType {
    /// Parses the exact form value (`"include"` or `"exclude"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "include" => Some(CustomerTagsType::Include),
            "exclude" => Some(CustomerTagsType::Exclude),
            _ => None,
        }
    }
}

/// Whether `discount_value` is an amount or a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// A fixed amount off each delivery group.
    Fixed,
    /// A percentage (0–100) off each delivery group.
    Percentage,
    /// Anything else found in storage.
    #[default]
    #[serde(other)]
    #[ts(skip)]
    Unknown,
}

impl DiscountType {
    /// Parses the exact form value (`"fixed"` or `"percentage"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(DiscountType::Fixed),
            "percentage" => Some(DiscountType::Percentage),
            _ => None,
        }
    }
}

/// Canonical configuration of a flat shipping discount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ShippingDiscountConfig {
    #[serde(deserialize_with = "stored::string")]
    pub title: String,

    /// Kept when boolean. The evaluator ignores it and never serves guests.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stored::optional_bool"
    )]
    #[ts(optional)]
    pub allow_guest: Option<bool>,

    #[serde(deserialize_with = "stored::customer_tags_type")]
    pub customer_tags_type: CustomerTagsType,
    #[serde(deserialize_with = "stored::tags")]
    pub customer_tags: Vec<String>,

    /// `>= 0`, and `<= 100` for percentage discounts. NaN when unreadable.
    #[serde(deserialize_with = "stored::number")]
    pub discount_value: f64,
    #[serde(deserialize_with = "stored::discount_type")]
    pub discount_type: DiscountType,

    /// Trimmed merchant note. Not shown at checkout.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stored::optional_string"
    )]
    #[ts(optional)]
    pub discount_message: Option<String>,
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Read-only view of the cart handed to an evaluator.
///
/// The tag predicates on [`Customer`] and the exclusion flag on
/// [`Merchandise::ProductVariant`] are computed by the pricing system before
/// the evaluator runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSnapshot {
    /// Cart subtotal. NaN when the amount could not be read.
    pub subtotal: f64,
    pub lines: Vec<CartLine>,
    pub customer: Option<Customer>,
    pub delivery_groups: Vec<DeliveryGroup>,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub merchandise: Merchandise,
}

impl CartLine {
    /// Id of the variant if this line is excluded from discounts.
    pub fn excluded_variant_id(&self) -> Option<&str> {
        match &self.merchandise {
            Merchandise::ProductVariant {
                id,
                excluded_from_discount: true,
            } => Some(id),
            _ => None,
        }
    }
}

/// What a cart line sells.
#[derive(Debug, Clone, PartialEq)]
pub enum Merchandise {
    /// A product variant; `excluded_from_discount` reflects the product's tags.
    ProductVariant {
        id: String,
        excluded_from_discount: bool,
    },
    /// Any other merchandise (custom products, gift cards…). Never excluded.
    Other,
}

/// The logged-in buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Customer {
    /// Customer carries one of the shipping discount's `customer_tags`.
    pub has_tag: bool,

    /// Customer carries one of the tiered discount's `ensureAnyCustomerTags`.
    pub can_use_discount: bool,
}

/// A delivery group (a shipment) in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryGroup {
    pub id: String,
}

// =============================================================================
// Discount Decision
// =============================================================================

/// What an evaluator decided for one cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountDecision {
    /// Nothing applies.
    NoDiscount,
    /// A discount applies.
    Applied(AppliedDiscount),
}

impl DiscountDecision {
    /// Returns the applied discount, if any.
    pub fn applied(&self) -> Option<&AppliedDiscount> {
        match self {
            DiscountDecision::NoDiscount => None,
            DiscountDecision::Applied(applied) => Some(applied),
        }
    }

    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, DiscountDecision::Applied(_))
    }
}

/// A discount to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedDiscount {
    /// Checkout message, e.g. `"Wholesale (10%)"`.
    pub message: Option<String>,
    pub targets: DiscountTargets,
    pub value: DiscountValue,
}

/// What the discount applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTargets {
    /// The order subtotal, minus these variants.
    OrderSubtotal { excluded_variant_ids: Vec<String> },
    /// Each of these delivery groups.
    DeliveryGroups { ids: Vec<String> },
}

/// How much the discount takes off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValue {
    Percentage(f64),
    FixedAmount(f64),
}

// =============================================================================
// Stored Field Decoding
// =============================================================================

/// Field decoders for configs read back from storage.
///
/// ```text
/// title, discount_message    non-string        → "" / None
/// allow_guest                non-boolean       → None
/// *_tags                     parsed like form input
/// discount_value             non-numeric       → NaN   (never applied)
/// *_type                     unknown or odd    → Unknown (never applied)
/// thresholds                 items coerced; unreadable → NaN (never applied)
/// ```
mod stored {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{CustomerTagsType, DiscountType};
    use crate::number::{coerce_number, numeric_field};
    use crate::tags::parse_tags;
    use crate::thresholds::{ThresholdList, ThresholdTuple};

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(optional_string(deserializer)?.unwrap_or_default())
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn optional_bool<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        Ok(Value::deserialize(deserializer)?.as_bool())
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(numeric_field(&Value::deserialize(deserializer)?).unwrap_or(f64::NAN))
    }

    pub fn tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(parse_tags(&Value::deserialize(deserializer)?))
    }

    pub fn customer_tags_type<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<CustomerTagsType, D::Error> {
        Ok(optional_string(deserializer)?
            .and_then(|s| CustomerTagsType::parse(&s))
            .unwrap_or_default())
    }

    pub fn discount_type<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DiscountType, D::Error> {
        Ok(optional_string(deserializer)?
            .and_then(|s| DiscountType::parse(&s))
            .unwrap_or_default())
    }

    /// Keeps order and count; the evaluator sorts, clamps and rejects NaN.
    pub fn thresholds<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ThresholdList, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Some(items) = value.as_array() else {
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([percentage, minimum]) => ThresholdTuple(
                    coerce_number(percentage).unwrap_or(f64::NAN),
                    coerce_number(minimum).unwrap_or(f64::NAN),
                ),
                _ => ThresholdTuple(f64::NAN, f64::NAN),
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
