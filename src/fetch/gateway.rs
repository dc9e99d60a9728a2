// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Single-date fetch with timeout and failure classification
//!
//! [`FetchGateway::fetch_date`] never fails. Every way a date can come back
//! without records is classified into a [`FetchOutcome`] so the range
//! computation can fold it into "no data" while logs still tell expected
//! absence apart from real trouble.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, trace, warn, Instrument};

use super::{SnapshotLayout, SnapshotSource};
use crate::config::constants::layout::RECORDS_FIELD;
use crate::errors::FetchFailure;
use crate::tracing::spans;
use crate::types::{DateKey, Record};

/// What a single-date fetch produced
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The snapshot holds at least one record
    Records(Vec<Record>),
    /// The snapshot exists and holds no records
    ConfirmedEmpty,
    /// No usable snapshot could be obtained
    Unavailable(FetchFailure),
}

impl FetchOutcome {
    /// `None` when unavailable, `Some(vec![])` when confirmed empty
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            FetchOutcome::Records(records) => Some(records),
            FetchOutcome::ConfirmedEmpty => Some(Vec::new()),
            FetchOutcome::Unavailable(_) => None,
        }
    }

    /// Returns true when the date contributed at least one record
    pub fn has_records(&self) -> bool {
        matches!(self, FetchOutcome::Records(_))
    }
}

/// Fetches one date's snapshot from a [`SnapshotSource`]
///
/// Addresses come from the injected [`SnapshotLayout`]; each fetch runs under
/// the configured timeout.
///
/// # Examples
///
/// ```rust,ignore
/// use snapcache::{FetchGateway, FsSnapshotSource, MonthlyJsonLayout};
/// use std::{sync::Arc, time::Duration};
///
/// let gateway = FetchGateway::new(
///     Arc::new(FsSnapshotSource::new("public")),
///     Arc::new(MonthlyJsonLayout::default()),
///     Duration::from_secs(2),
/// );
/// let outcome = gateway.fetch_date("2025-06-29".parse()?).await;
/// ```
pub struct FetchGateway {
    source: Arc<dyn SnapshotSource>,
    layout: Arc<dyn SnapshotLayout>,
    timeout: Duration,
    /// Dates whose malformed payload has already been reported
    reported_shapes: Mutex<HashSet<DateKey>>,
}

impl FetchGateway {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        layout: Arc<dyn SnapshotLayout>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            layout,
            timeout,
            reported_shapes: Mutex::new(HashSet::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn layout(&self) -> &dyn SnapshotLayout {
        self.layout.as_ref()
    }

    /// Fetches and classifies the snapshot for `date`
    pub async fn fetch_date(&self, date: DateKey) -> FetchOutcome {
        let address = self.layout.address(date);
        let span = spans::fetch_date(date, &address);

        async move {
            let response = tokio::time::timeout(self.timeout, self.source.fetch(&address)).await;

            let outcome = match response {
                Err(_elapsed) => FetchOutcome::Unavailable(FetchFailure::Timeout {
                    date,
                    timeout: self.timeout,
                }),
                Ok(Err(e)) => FetchOutcome::Unavailable(FetchFailure::transport(date, &e)),
                Ok(Ok(None)) => FetchOutcome::Unavailable(FetchFailure::NotFound { date }),
                Ok(Ok(Some(body))) => {
                    let parsed = classify_body(date, &body);
                    if parsed.rejected > 0 && self.first_report(date) {
                        warn!(
                            source = self.source.name(),
                            rejected = parsed.rejected,
                            "Skipped malformed records in snapshot"
                        );
                    }
                    parsed.outcome
                }
            };

            self.log_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    fn log_outcome(&self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Records(records) => {
                trace!(records = records.len(), "Snapshot fetched");
            }
            FetchOutcome::ConfirmedEmpty => trace!("Snapshot confirmed empty"),
            FetchOutcome::Unavailable(failure @ FetchFailure::UnexpectedShape { date, .. }) => {
                if self.first_report(*date) {
                    warn!(source = self.source.name(), error = %failure, "Unexpected snapshot payload");
                } else {
                    trace!(error = %failure, "Unexpected snapshot payload (already reported)");
                }
            }
            FetchOutcome::Unavailable(failure) if failure.is_expected_absence() => {
                trace!(reason = %failure, "Snapshot unavailable");
            }
            FetchOutcome::Unavailable(failure) => {
                debug!(source = self.source.name(), error = %failure, "Snapshot fetch failed");
            }
        }
    }

    /// Marks `date` as reported, returning true the first time only
    fn first_report(&self, date: DateKey) -> bool {
        self.reported_shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(date)
    }
}

impl std::fmt::Debug for FetchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchGateway")
            .field("source", &self.source.name())
            .field("layout", &self.layout)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A classified body plus the number of records that failed to decode
struct ParsedBody {
    outcome: FetchOutcome,
    rejected: usize,
}

impl From<FetchOutcome> for ParsedBody {
    fn from(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            rejected: 0,
        }
    }
}

/// Parses a snapshot body into an outcome
///
/// A document without the records field, or with a null or empty one, is a
/// confirmed empty snapshot. Records are decoded one at a time; malformed ones
/// are skipped and counted, and the date is unusable only when none decode.
fn classify_body(date: DateKey, body: &[u8]) -> ParsedBody {
    let document: Value = match serde_json::from_slice(body) {
        Ok(document) => document,
        Err(e) => {
            return FetchOutcome::Unavailable(FetchFailure::unexpected_shape(
                date,
                format!("invalid JSON: {e}"),
            ))
            .into()
        }
    };

    let Value::Object(mut document) = document else {
        return FetchOutcome::Unavailable(FetchFailure::unexpected_shape(
            date,
            "top-level value is not an object",
        ))
        .into();
    };

    let items = match document.remove(RECORDS_FIELD) {
        None | Some(Value::Null) => return FetchOutcome::ConfirmedEmpty.into(),
        Some(Value::Array(items)) if items.is_empty() => {
            return FetchOutcome::ConfirmedEmpty.into()
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return FetchOutcome::Unavailable(FetchFailure::unexpected_shape(
                date,
                format!("`{RECORDS_FIELD}` is not an array"),
            ))
            .into()
        }
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    let mut last_error = None;
    for item in items {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(e) => last_error = Some(e),
        }
    }

    let rejected = total - records.len();
    if records.is_empty() {
        let details = match last_error {
            Some(e) => format!("all {total} records malformed: {e}"),
            None => format!("all {total} records malformed"),
        };
        return FetchOutcome::Unavailable(FetchFailure::unexpected_shape(date, details)).into();
    }

    ParsedBody {
        outcome: FetchOutcome::Records(records),
        rejected,
    }
}
