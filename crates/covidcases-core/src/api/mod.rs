//! REST API client module for the UK coronavirus dashboard.
//!
//! This module provides the `ApiClient` for querying the public case API
//! (`api.coronavirus.data.gov.uk`) and the `CaseSource` trait the cache
//! loader fetches through.
//!
//! The API needs no authentication. Results are paginated and are
//! reassembled here into a single document before being cached.

pub mod client;
pub mod error;
pub mod source;

pub use client::{ApiClient, API_BASE_URL};
pub use error::ApiError;
pub use source::CaseSource;
