//! # Tally Function
//!
//! Pricing function runner for the tiered order and shipping discounts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Function Runner                                  │
//! │                                                                         │
//! │  stdin ───► wire::FunctionInput ───► run ───► tally-core evaluators    │
//! │                                        │                                │
//! │                                        ▼                                │
//! │  stdout ◄─── wire::FunctionRunResult ◄─┘                                │
//! │                                                                         │
//! │  stderr ◄─── tracing (TALLY_LOG)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `TALLY_LOG` - log filter directive (default: warn)
//! - `TALLY_PRETTY_OUTPUT` - pretty-print JSON output (default: false)
//! - `TALLY_LOG_ANSI` - colored log lines (default: false)

pub mod commands;
pub mod config;
pub mod error;
pub mod run;
pub mod wire;

// Re-exports
pub use commands::DiscountKind;
pub use config::FunctionConfig;
pub use error::{FunctionError, RunnerResult};
pub use run::{run_order_discount, run_shipping_discount};
pub use wire::{FunctionInput, FunctionRunResult};
