// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream snapshot sources
//!
//! A [`SnapshotSource`] turns an address into raw bytes. It distinguishes
//! "nothing published here" (`Ok(None)`) from transport failure (`Err`), and
//! knows nothing about dates, payload shapes or caching.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

use crate::errors::SourceError;

/// Raw single-address fetch primitive
///
/// # Thread Safety
///
/// Implementations are shared across concurrently running fetches and must be
/// `Send + Sync`.
///
/// # Error Handling
///
/// Return `Ok(None)` for the normal "not published" case (a 404, a missing
/// file). Reserve `Err` for failures worth distinguishing in diagnostics.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the bytes published at `address`
    async fn fetch(&self, address: &str) -> Result<Option<Vec<u8>>, SourceError>;

    /// Returns a human-readable name for this source
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

/// Reads snapshots from a local directory tree
///
/// Addresses are resolved relative to `root`; a leading `/` is ignored and
/// addresses that would escape `root` are rejected.
///
/// # Examples
///
/// ```rust,ignore
/// use snapcache::{FsSnapshotSource, SnapshotCache, CacheConfig};
/// use std::sync::Arc;
///
/// let source = FsSnapshotSource::new("public");
/// let cache = SnapshotCache::new(Arc::new(source), CacheConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct FsSnapshotSource {
    root: PathBuf,
}

impl FsSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, address: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(address.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(SourceError::request(
                address,
                "address escapes the snapshot root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl SnapshotSource for FsSnapshotSource {
    async fn fetch(&self, address: &str) -> Result<Option<Vec<u8>>, SourceError> {
        let path = self.resolve(address)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %path.display(), "Snapshot file not present");
                Ok(None)
            }
            Err(e) => Err(SourceError::io(address, e)),
        }
    }

    fn name(&self) -> &'static str {
        "FsSnapshotSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_present_files_and_reports_missing_ones() {
        let dir = TempDir::new().unwrap();
        let month_dir = dir.path().join("2025/july");
        std::fs::create_dir_all(&month_dir).unwrap();
        std::fs::write(month_dir.join("july_01_2025.json"), br#"{"players":[]}"#).unwrap();

        let source = FsSnapshotSource::new(dir.path());

        let found = source
            .fetch("/2025/july/july_01_2025.json")
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some(&br#"{"players":[]}"#[..]));

        let missing = source
            .fetch("/2025/july/july_02_2025.json")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn rejects_addresses_outside_root() {
        let dir = TempDir::new().unwrap();
        let source = FsSnapshotSource::new(dir.path());

        let err = source.fetch("/../etc/passwd").await.unwrap_err();
        assert!(matches!(err, SourceError::Request { .. }));
    }

    #[tokio::test]
    async fn directory_read_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("2025")).unwrap();
        let source = FsSnapshotSource::new(dir.path());

        let err = source.fetch("/2025").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
