//! covidcases core library.
//!
//! Fetches UK COVID-19 case figures from the coronavirus dashboard API,
//! caches them locally, pivots them into a date-indexed table, transforms
//! the table and merges it into GeoJSON features.
//!
//! Pipeline, leaf first:
//! - [`cache::CacheManager`] loads a cached document, refetching through an
//!   [`api::CaseSource`] when it is missing or stale
//! - [`table::CaseTable`] pivots the record list into rows by date
//! - [`transform::Pipeline`] selects, averages and normalises columns
//! - [`geo::merge_into_features`] attaches each column to its GeoJSON feature

pub mod api;
pub mod cache;
pub mod config;
pub mod geo;
pub mod models;
pub mod table;
pub mod transform;
pub mod utils;

pub use api::{ApiClient, ApiError, CaseSource};
pub use cache::{CacheError, CacheManager, CacheSnapshot, SnapshotOrigin};
pub use config::Config;
pub use geo::{load_feature_collection, merge_into_features, GeoError};
pub use models::{AreaKind, CaseKind, CaseRecord, CaseResponse};
pub use table::{CaseTable, Row, DATE_COLUMN};
pub use transform::{Pipeline, TransformError};
