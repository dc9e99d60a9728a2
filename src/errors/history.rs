//! Error types for entity history lookups.

/// Errors that can occur when looking up an entity's recent history.
///
/// History lookups are pure scans over an already-resolved date map, so the
/// only failure is a caller passing arguments that can never produce a
/// meaningful result.
///
/// # Examples
///
/// ```rust
/// use snapcache::{DateMap, EntityHistoryIndex, HistoryError};
///
/// let index = EntityHistoryIndex::new();
/// let result = index.find_recent("J. Smith", "NYM", &DateMap::new(), 0);
/// assert!(matches!(result, Err(HistoryError::InvalidArgument { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// An argument is outside its valid domain.
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl HistoryError {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        HistoryError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}
