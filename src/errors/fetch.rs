// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for single-date snapshot fetches.
//!
//! Two layers live here:
//!
//! - [`SourceError`] is what a [`crate::fetch::SnapshotSource`] returns when the
//!   underlying transport fails.
//! - [`FetchFailure`] is the gateway's classification of why a date produced no
//!   records. It is carried inside [`crate::fetch::FetchOutcome`] and never
//!   propagated out of a range lookup.

use std::time::Duration;

use crate::types::DateKey;

/// Errors returned by a snapshot source implementation.
///
/// A source reports "nothing published at this address" as `Ok(None)`, not as
/// an error. `SourceError` is reserved for transport problems.
///
/// # Examples
///
/// ```rust
/// use snapcache::SourceError;
///
/// let error = SourceError::request("/data/2025/july/july_01_2025.json", "connection reset");
/// assert!(error.to_string().contains("connection reset"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Filesystem or socket level failure while reading an address.
    #[error("I/O error reading {address}")]
    Io {
        /// Address that was being read
        address: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The request was rejected or could not be completed.
    #[error("Request for {address} failed: {details}")]
    Request {
        /// Address that was requested
        address: String,
        /// Details about the failure
        details: String,
    },

    /// Any other source-specific failure.
    #[error("Snapshot source failed for {address}")]
    Other {
        /// Address that was requested
        address: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SourceError {
    /// Create an `Io` error for an address.
    pub fn io(address: impl Into<String>, source: std::io::Error) -> Self {
        SourceError::Io {
            address: address.into(),
            source,
        }
    }

    /// Create a `Request` error with details.
    pub fn request(address: impl Into<String>, details: impl Into<String>) -> Self {
        SourceError::Request {
            address: address.into(),
            details: details.into(),
        }
    }

    /// Create an `Other` error from any error type.
    pub fn other(
        address: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SourceError::Other {
            address: address.into(),
            source: Box::new(source),
        }
    }
}

/// Why a single date produced no records.
///
/// `Timeout` and `NotFound` are the expected, dominant cases (off-days,
/// off-season, unpublished dates). `Transport` and `UnexpectedShape` are
/// unexpected but are still folded into "no data" by the range computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// The source did not answer within the configured timeout.
    #[error("Fetch for {date} timed out after {timeout:?}")]
    Timeout {
        /// Date being fetched
        date: DateKey,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// The source reported that nothing is published for this date.
    #[error("No snapshot published for {date}")]
    NotFound {
        /// Date being fetched
        date: DateKey,
    },

    /// The source failed at the transport level.
    #[error("Transport failure fetching {date}: {details}")]
    Transport {
        /// Date being fetched
        date: DateKey,
        /// Rendered source error
        details: String,
    },

    /// The payload was not a snapshot document.
    #[error("Unexpected payload shape for {date}: {details}")]
    UnexpectedShape {
        /// Date being fetched
        date: DateKey,
        /// What was wrong with the payload
        details: String,
    },
}

impl FetchFailure {
    /// Create a `Transport` failure from a source error.
    pub fn transport(date: DateKey, source: &SourceError) -> Self {
        FetchFailure::Transport {
            date,
            details: source.to_string(),
        }
    }

    /// Create an `UnexpectedShape` failure with details.
    pub fn unexpected_shape(date: DateKey, details: impl Into<String>) -> Self {
        FetchFailure::UnexpectedShape {
            date,
            details: details.into(),
        }
    }

    /// The date this failure belongs to.
    pub fn date(&self) -> DateKey {
        match self {
            FetchFailure::Timeout { date, .. }
            | FetchFailure::NotFound { date }
            | FetchFailure::Transport { date, .. }
            | FetchFailure::UnexpectedShape { date, .. } => *date,
        }
    }

    /// Returns true for the absences that are normal for a sparse dataset.
    pub fn is_expected_absence(&self) -> bool {
        matches!(
            self,
            FetchFailure::Timeout { .. } | FetchFailure::NotFound { .. }
        )
    }
}
