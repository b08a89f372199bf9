//! Function runner configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable              | Default | Meaning                               |
//! |-----------------------|---------|---------------------------------------|
//! | `TALLY_LOG`           | `warn`  | `EnvFilter` directive (stderr logs)   |
//! | `TALLY_PRETTY_OUTPUT` | `false` | Pretty-print JSON written to stdout   |
//! | `TALLY_LOG_ANSI`      | `false` | Colored log output                    |

use serde::{Deserialize, Serialize};
use std::env;

/// Function runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Tracing filter directive, e.g. `warn` or `tally_core=debug`
    pub log_filter: String,

    /// Pretty-print JSON written to stdout
    pub pretty_output: bool,

    /// Emit ANSI colors in log lines
    pub log_ansi: bool,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            log_filter: "warn".to_string(),
            pretty_output: false,
            log_ansi: false,
        }
    }
}

impl FunctionConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FunctionConfig::default();

        let log_filter = lookup("TALLY_LOG")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_filter);

        let config = FunctionConfig {
            log_filter,
            pretty_output: parse_flag(&lookup, "TALLY_PRETTY_OUTPUT", defaults.pretty_output)?,
            log_ansi: parse_flag(&lookup, "TALLY_LOG_ANSI", defaults.log_ansi)?,
        };

        Ok(config)
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key.to_string())),
        },
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
