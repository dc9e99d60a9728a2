// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across snapcache.
//!
//! This module provides newtype wrappers for the domain concepts:
//! - Date keys and the sparse date map
//! - Snapshot records and their identity fields
//! - Configuration values (batch width, candidate cap, early-stop threshold)

pub mod config;
mod date;
mod date_map;
mod record;

pub use config::{BatchSize, CandidateCap, EarlyStopThreshold};
pub use date::DateKey;
pub use date_map::DateMap;
pub use record::Record;
