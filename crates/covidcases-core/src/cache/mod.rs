//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! case API documents locally. Each granularity is cached verbatim in its
//! own JSON file and considered stale two days after the file was last
//! written.
//!
//! Loading follows a bounded fallback chain: fresh cache, then a refetch,
//! then whatever stale copy is on disk, then a terminal `NoData` error.

pub mod error;
pub mod manager;

pub use error::CacheError;
pub use manager::{
    recovery_for, CacheManager, CacheSnapshot, Recovery, SnapshotOrigin,
    DEFAULT_STALE_AFTER_DAYS, MAX_LOAD_ATTEMPTS,
};
