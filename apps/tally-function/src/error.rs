//! # Function Error Type
//!
//! Failures of the runner itself: reading input, decoding JSON, loading
//! configuration. A cart that gets no discount is NOT an error.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in tally-function                         │
//! │                                                                         │
//! │  stdin / --input file                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  read fails? ─────────────── FunctionError::Io ──────────────┐         │
//! │         │                                                    │         │
//! │         ▼                                                    ▼         │
//! │  not a function input? ───── FunctionError::InvalidInput ── exit 1     │
//! │         │                                                              │
//! │         ▼                                                              │
//! │  stored config unreadable? ── warn! + NoDiscount (exit 0)              │
//! │         │                                                              │
//! │         ▼                                                              │
//! │  function result on stdout (exit 0)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the function runner.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document is not valid JSON for the expected shape.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience type alias for runner results.
pub type RunnerResult<T> = Result<T, FunctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: FunctionError = ConfigError::InvalidValue("TALLY_PRETTY_OUTPUT".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for TALLY_PRETTY_OUTPUT"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FunctionError = json_err.into();
        assert!(err.to_string().starts_with("Invalid input:"));
    }
}
