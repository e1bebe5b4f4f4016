//! Utility functions for formatting ages, dates and table cells.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{date_timestamp, format_age, format_cell};
