//! # tally-core: Pure Discount Rules for Tally
//!
//! This crate is the **heart** of Tally Discounts. It decides which discount,
//! if any, applies to a cart, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tally Discounts Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin UI (TypeScript)                        │   │
//! │  │    Discount form ──► validate ──► store configuration           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw JSON                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐   │   │
//! │  │   │   tags   │  │ thresholds │  │ validation │  │ evaluate │   │   │
//! │  │   │  parser  │  │ normalizer │  │  configs   │  │ decision │   │   │
//! │  │   └──────────┘  └────────────┘  └────────────┘  └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │ canonical config + cart snapshot       │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │              tally-function (pricing function runner)           │   │
//! │  │          stdin function input ──► stdout function result        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tags`] - Tag list parsing
//! - [`thresholds`] - Tier list validation, clamping and sorting
//! - [`validation`] - Raw input → canonical configuration
//! - [`evaluate`] - Canonical configuration + cart → decision
//! - [`types`] - Configs, cart snapshot, decision
//! - [`display`] - Canonical values back to form text
//! - [`number`] - Number coercion and formatting
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Reading carts or configs from anywhere is the caller's job
//! 3. **Typed Boundary**: Raw JSON is only read by [`validation`] and [`thresholds`]
//! 4. **Explicit Errors**: Validation returns every failure; evaluation never fails
//!
//! ## Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use tally_core::{evaluate_tiered, validate_tiered_config};
//! use tally_core::types::{CartLine, CartSnapshot, Customer, DiscountValue, Merchandise};
//!
//! let config = validate_tiered_config(
//!     &json!({ "title": "Wholesale", "thresholds": "[[5, 0], [10, 600]]" }),
//!     None,
//! )
//! .unwrap();
//!
//! let cart = CartSnapshot {
//!     subtotal: 650.0,
//!     lines: vec![CartLine { merchandise: Merchandise::Other }],
//!     customer: Some(Customer::default()),
//!     delivery_groups: vec![],
//! };
//!
//! let decision = evaluate_tiered(&config, &cart);
//! assert_eq!(decision.applied().unwrap().value, DiscountValue::Percentage(10.0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod display;
pub mod error;
pub mod evaluate;
pub mod number;
pub mod tags;
pub mod thresholds;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::evaluate_tiered` instead of
// `use tally_core::evaluate::evaluate_tiered`

pub use error::{FieldError, ThresholdError, ValidationErrors};
pub use evaluate::{evaluate_shipping, evaluate_tiered};
pub use tags::parse_tags;
pub use thresholds::{normalize_thresholds, ThresholdList, ThresholdTuple};
pub use types::*;
pub use validation::{validate_shipping_config, validate_tiered_config};
