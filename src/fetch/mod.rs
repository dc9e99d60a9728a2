//! Fetching single-date snapshots
//!
//! - [`SnapshotSource`]: raw address → bytes primitive ([`FsSnapshotSource`]
//!   reads a local directory tree)
//! - [`SnapshotLayout`]: date → address ([`MonthlyJsonLayout`] by default)
//! - [`FetchGateway`]: timeout and classification into [`FetchOutcome`]

mod gateway;
mod layout;
mod source;

pub use gateway::{FetchGateway, FetchOutcome};
pub use layout::{MonthlyJsonLayout, SnapshotLayout};
pub use source::{FsSnapshotSource, SnapshotSource};
