//! Error types for configuration and date parsing.

/// Errors raised while building a [`crate::CacheConfig`] or a season window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A value that must be positive was zero.
    #[error("Configuration value `{field}` must be greater than zero")]
    ZeroValue {
        /// Name of the configuration field
        field: &'static str,
    },

    /// The season window is not a valid calendar range.
    #[error("Invalid season window: {reason}")]
    InvalidSeasonWindow {
        /// Why the window was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create a `ZeroValue` error.
    pub fn zero_value(field: &'static str) -> Self {
        ConfigError::ZeroValue { field }
    }

    /// Create an `InvalidSeasonWindow` error.
    pub fn invalid_season_window(reason: impl Into<String>) -> Self {
        ConfigError::InvalidSeasonWindow {
            reason: reason.into(),
        }
    }
}

/// A string could not be parsed as a `YYYY-MM-DD` date key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date key `{input}`: expected YYYY-MM-DD")]
pub struct DateKeyError {
    /// The rejected input
    pub input: String,
    /// The underlying chrono parse error
    #[source]
    pub source: chrono::ParseError,
}
