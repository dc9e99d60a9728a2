// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for snapcache integration tests
//!
//! Provides a scripted [`SnapshotSource`] so cache behavior can be tested
//! without a real snapshot store.

use async_trait::async_trait;
use serde_json::json;
use snapcache::{
    CacheConfig, DateKey, FixedClock, MonthlyJsonLayout, Record, SnapshotCache, SnapshotLayout,
    SnapshotSource, SourceError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock source does for one address
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    /// A snapshot holding these records
    Records(Vec<Record>),
    /// A snapshot with an empty record list
    Empty,
    /// Nothing published
    Missing,
    /// Transport failure
    Fail,
    /// Never answers within any reasonable timeout
    Hang,
    /// Panics inside the fetch
    Panic,
    /// Raw body bytes
    Raw(String),
}

/// Mock SnapshotSource with per-date responses and call recording
///
/// Responses are keyed by the address [`MonthlyJsonLayout::default`] builds
/// for each date, so pair it with the default layout.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockSnapshotSource::new()
///     .with_records("2025-06-29", vec![player("J. Smith", "NYM")])
///     .with_latency(Duration::from_millis(50));
///
/// let cache = cache_with(Arc::clone(&source), CacheConfig::default(), "2025-07-15");
/// ```
pub struct MockSnapshotSource {
    layout: MonthlyJsonLayout,
    responses: HashMap<String, MockResponse>,
    fallback: MockResponse,
    latency: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockSnapshotSource {
    /// Create a source where every date is missing
    pub fn new() -> Self {
        Self {
            layout: MonthlyJsonLayout::default(),
            responses: HashMap::new(),
            fallback: MockResponse::Missing,
            latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the response for one date
    pub fn with_response(mut self, date: &str, response: MockResponse) -> Self {
        self.responses
            .insert(self.layout.address(self::date(date)), response);
        self
    }

    /// Publish records for one date
    pub fn with_records(self, date: &str, records: Vec<Record>) -> Self {
        self.with_response(date, MockResponse::Records(records))
    }

    /// Set the response for every date without an explicit one
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Delay every fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Addresses fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of fetches issued for one date
    pub fn calls_for(&self, date: &str) -> usize {
        let address = self.layout.address(self::date(date));
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == address)
            .count()
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn fetch(&self, address: &str) -> Result<Option<Vec<u8>>, SourceError> {
        self.calls.lock().unwrap().push(address.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let response = self.responses.get(address).unwrap_or(&self.fallback);
        match response {
            MockResponse::Records(records) => {
                Ok(Some(json!({ "players": records }).to_string().into_bytes()))
            }
            MockResponse::Empty => Ok(Some(br#"{"players":[]}"#.to_vec())),
            MockResponse::Missing => Ok(None),
            MockResponse::Fail => Err(SourceError::request(address, "mock transport failure")),
            MockResponse::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
            MockResponse::Panic => panic!("mock source panicked for {address}"),
            MockResponse::Raw(body) => Ok(Some(body.clone().into_bytes())),
        }
    }

    fn name(&self) -> &'static str {
        "MockSnapshotSource"
    }
}

/// Parse a `YYYY-MM-DD` date key
pub fn date(s: &str) -> DateKey {
    s.parse().unwrap()
}

/// Create a record with just identity fields
#[allow(dead_code)]
pub fn player(name: &str, team: &str) -> Record {
    Record::new(name, team)
}

/// Build a cache over `source` with the default layout and a pinned "today"
#[allow(dead_code)]
pub fn cache_with(
    source: Arc<MockSnapshotSource>,
    config: CacheConfig,
    today: &str,
) -> SnapshotCache {
    SnapshotCache::with_collaborators(
        source,
        Arc::new(MonthlyJsonLayout::default()),
        Arc::new(FixedClock::new(date(today))),
        config,
    )
}

/// Install a test subscriber honoring `RUST_LOG`; safe to call repeatedly
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
