//! Configuration for snapcache
//!
//! This module provides the configuration that controls caching lifetimes,
//! fetch timeouts and the shape of a range fetch (batch width, candidate cap,
//! early-stop threshold, season window).
//!
//! # Example: Using defaults
//!
//! ```rust
//! use snapcache::CacheConfig;
//!
//! // 15 minute TTL and sweep, 2s fetch timeout, batches of 10, stop at 30 dates
//! let config = CacheConfig::default();
//! assert_eq!(config.batch_size.as_usize(), 10);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use snapcache::CacheConfigBuilder;
//! use std::time::Duration;
//!
//! let config = CacheConfigBuilder::new()
//!     .ttl(Duration::from_secs(300))
//!     .fetch_timeout(Duration::from_millis(500))
//!     .batch_size(5)
//!     .season((4, 1), (9, 30))
//!     .build()?;
//! # Ok::<(), snapcache::ConfigError>(())
//! ```

use std::time::Duration;

use crate::dates::SeasonWindow;
use crate::errors::ConfigError;
use crate::types::{BatchSize, CandidateCap, EarlyStopThreshold};

pub mod constants;

use constants::{DEFAULT_FETCH_TIMEOUT, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};

/// Configuration for a [`crate::SnapshotCache`]
///
/// Use [`CacheConfigBuilder`] for a validated, fluent construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a resolved range (or single date) is served from cache
    /// Default: 15 minutes
    pub ttl: Duration,

    /// Minimum time between wholesale range-cache sweeps
    /// Default: 15 minutes
    pub sweep_interval: Duration,

    /// Timeout applied to each single-date fetch
    /// Default: 2 seconds
    pub fetch_timeout: Duration,

    /// Number of dates fetched concurrently per batch
    /// Default: 10
    pub batch_size: BatchSize,

    /// Maximum candidate dates generated for one range
    /// Default: 500
    pub candidate_cap: CandidateCap,

    /// Dates-with-data count after which a range fetch stops
    /// Default: 30
    pub early_stop: EarlyStopThreshold,

    /// Per-year window in which snapshots are published
    /// Default: March 20 through October 31
    pub season: SeasonWindow,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            batch_size: BatchSize::DEFAULT,
            candidate_cap: CandidateCap::DEFAULT,
            early_stop: EarlyStopThreshold::DEFAULT,
            season: SeasonWindow::default(),
        }
    }
}

impl CacheConfig {
    /// Checks that every count and duration that must be positive is positive
    ///
    /// # Example
    ///
    /// ```rust
    /// use snapcache::{BatchSize, CacheConfig};
    ///
    /// let mut config = CacheConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.batch_size = BatchSize::new(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl.is_zero() {
            return Err(ConfigError::zero_value("ttl"));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::zero_value("sweep_interval"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::zero_value("fetch_timeout"));
        }
        if self.batch_size.as_usize() == 0 {
            return Err(ConfigError::zero_value("batch_size"));
        }
        if self.candidate_cap.as_usize() == 0 {
            return Err(ConfigError::zero_value("candidate_cap"));
        }
        if self.early_stop.as_usize() == 0 {
            return Err(ConfigError::zero_value("early_stop"));
        }
        Ok(())
    }
}

/// Builder for [`CacheConfig`]
///
/// Starts from [`CacheConfig::default`]; [`CacheConfigBuilder::build`]
/// validates the result.
///
/// # Example
///
/// ```rust
/// use snapcache::CacheConfigBuilder;
///
/// let config = CacheConfigBuilder::new()
///     .early_stop(10)
///     .candidate_cap(100)
///     .build()
///     .unwrap();
/// assert_eq!(config.early_stop.as_usize(), 10);
/// ```
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
    season: Option<((u32, u32), (u32, u32))>,
}

impl CacheConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long resolved ranges stay fresh
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = ttl;
        self
    }

    /// Set the minimum time between wholesale sweeps
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Set the per-date fetch timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Set the number of concurrent fetches per batch
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = BatchSize::new(size);
        self
    }

    /// Set the maximum number of candidate dates per range
    pub fn candidate_cap(mut self, cap: usize) -> Self {
        self.config.candidate_cap = CandidateCap::new(cap);
        self
    }

    /// Set the dates-with-data count that ends a range fetch early
    pub fn early_stop(mut self, threshold: usize) -> Self {
        self.config.early_stop = EarlyStopThreshold::new(threshold);
        self
    }

    /// Set the season window as inclusive `(month, day)` bounds
    ///
    /// The window is validated by [`CacheConfigBuilder::build`].
    pub fn season(mut self, start: (u32, u32), end: (u32, u32)) -> Self {
        self.season = Some((start, end));
        self
    }

    /// Disable the seasonal filter
    pub fn all_year(mut self) -> Self {
        self.season = None;
        self.config.season = SeasonWindow::all_year();
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero counts or durations and for an invalid
    /// season window.
    pub fn build(self) -> Result<CacheConfig, ConfigError> {
        let mut config = self.config;
        if let Some((start, end)) = self.season {
            config.season = SeasonWindow::new(start, end)?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();

        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.sweep_interval, Duration::from_secs(900));
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert_eq!(config.batch_size, BatchSize::new(10));
        assert_eq!(config.candidate_cap, CandidateCap::new(500));
        assert_eq!(config.early_stop, EarlyStopThreshold::new(30));
        assert_eq!(config.season, SeasonWindow::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CacheConfigBuilder::new()
            .ttl(Duration::from_millis(50))
            .batch_size(4)
            .early_stop(8)
            .build()
            .unwrap();

        assert_eq!(config.ttl, Duration::from_millis(50));
        assert_eq!(config.batch_size, BatchSize::new(4));
        assert_eq!(config.early_stop, EarlyStopThreshold::new(8));
        // Untouched fields keep defaults
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_builder_rejects_zero_values() {
        let err = CacheConfigBuilder::new().batch_size(0).build().unwrap_err();
        assert_eq!(err, ConfigError::zero_value("batch_size"));

        let err = CacheConfigBuilder::new()
            .fetch_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::zero_value("fetch_timeout"));

        assert!(CacheConfigBuilder::new().early_stop(0).build().is_err());
        assert!(CacheConfigBuilder::new().candidate_cap(0).build().is_err());
        assert!(CacheConfigBuilder::new().ttl(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_builder_season() {
        let config = CacheConfigBuilder::new()
            .season((4, 1), (9, 30))
            .build()
            .unwrap();
        assert_eq!(config.season, SeasonWindow::new((4, 1), (9, 30)).unwrap());

        let err = CacheConfigBuilder::new()
            .season((9, 30), (4, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeasonWindow { .. }));

        let config = CacheConfigBuilder::new()
            .season((4, 1), (9, 30))
            .all_year()
            .build()
            .unwrap();
        assert_eq!(config.season, SeasonWindow::all_year());
    }
}
