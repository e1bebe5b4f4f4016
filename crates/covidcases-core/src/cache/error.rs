use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cache is stale (written {age})")]
    Stale { age: String },

    #[error("Failed to read cache file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cache document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cache document {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch case data: {0}")]
    Fetch(#[from] ApiError),

    #[error("No data available: no usable cache at {} ({reason})", path.display())]
    NoData { path: PathBuf, reason: String },
}
