//! Data models for UK COVID-19 case data.
//!
//! This module contains the data structures used to represent the
//! government case API and the choices that select between its schemas:
//!
//! - `CaseRecord`, `CaseResponse`: one daily observation and the document
//!   that wraps a list of them
//! - `AreaKind`: region or local-authority granularity
//! - `CaseKind`: cumulative totals or daily deltas

pub mod area;
pub mod record;

pub use area::{AreaKind, CaseKind};
pub use record::{CaseRecord, CaseResponse};
