use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::CaseSource;
use crate::models::{AreaKind, CaseResponse};
use crate::utils::format_age;

use super::CacheError;

/// Consider cache stale after 2 days
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 2;

/// Fresh attempt, then one offline pass over whatever is on disk.
pub const MAX_LOAD_ATTEMPTS: u32 = 2;

/// Where the contents of a snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Read from a cache file that was fresh, or offline mode was requested
    Cache,
    /// Fetched from the API and written to the cache
    Fetched,
    /// Fetching failed; the existing cache file was served regardless of age
    StaleFallback { reason: String },
}

/// A cached case document and its freshness indicator.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub response: CaseResponse,
    /// Modification time of the cache file
    pub modified_at: DateTime<Utc>,
    pub origin: SnapshotOrigin,
}

impl CacheSnapshot {
    pub fn age(&self) -> Duration {
        Utc::now() - self.modified_at
    }

    pub fn age_minutes(&self) -> i64 {
        self.age().num_minutes()
    }

    pub fn age_display(&self) -> String {
        format_age(self.age_minutes())
    }

    pub fn is_stale(&self, stale_after: Duration) -> bool {
        self.age() > stale_after
    }

    fn with_origin(mut self, origin: SnapshotOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// What the loader does after a pass fails to produce usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Refetch,
    Fail,
}

/// Fallback policy: any cache problem earns a refetch on the first pass.
/// The second pass runs offline, so there is nothing left to try.
pub fn recovery_for(error: &CacheError, attempt: u32) -> Recovery {
    match error {
        CacheError::Stale { .. }
        | CacheError::NotFound(_)
        | CacheError::Io { .. }
        | CacheError::Parse { .. }
            if attempt < MAX_LOAD_ATTEMPTS =>
        {
            Recovery::Refetch
        }
        _ => Recovery::Fail,
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
    stale_after: Duration,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            stale_after: Duration::days(DEFAULT_STALE_AFTER_DAYS),
        })
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn cache_path(&self, kind: AreaKind) -> PathBuf {
        self.cache_dir.join(kind.cache_file_name())
    }

    /// Read and parse the cache file for `kind`, ignoring its age.
    pub fn read(&self, kind: AreaKind) -> Result<CacheSnapshot, CacheError> {
        let path = self.cache_path(kind);
        if !path.exists() {
            return Err(CacheError::NotFound(path));
        }

        let io_error = |source| CacheError::Io {
            path: path.clone(),
            source,
        };
        let contents = std::fs::read_to_string(&path).map_err(io_error)?;
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(io_error)?;

        let response: CaseResponse =
            serde_json::from_str(&contents).map_err(|source| CacheError::Parse {
                path: path.clone(),
                source,
            })?;

        let snapshot = CacheSnapshot {
            response,
            modified_at: DateTime::<Utc>::from(modified),
            origin: SnapshotOrigin::Cache,
        };
        debug!(
            cache = kind.label(),
            records = snapshot.response.data.len(),
            age = %snapshot.age_display(),
            "Loaded cache file"
        );
        Ok(snapshot)
    }

    /// Replace the cache file for `kind` with `document`.
    /// The new contents land in a sibling `.json.tmp` file and are renamed
    /// over the old one.
    pub fn save(&self, kind: AreaKind, document: &Value) -> Result<(), CacheError> {
        let path = self.cache_path(kind);
        let tmp_path = path.with_extension("json.tmp");
        let write_error = |source| CacheError::Write {
            path: path.clone(),
            source,
        };

        let contents = serde_json::to_string(document).map_err(|source| CacheError::Encode {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&tmp_path, contents).map_err(write_error)?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_error(e));
        }
        Ok(())
    }

    /// Fetch a new document from `source`, validate it and replace the cache.
    pub async fn refresh<S: CaseSource + ?Sized>(
        &self,
        kind: AreaKind,
        source: &S,
    ) -> Result<CacheSnapshot, CacheError> {
        info!(cache = kind.label(), "Fetching new case data");
        let document = source.fetch_cases(kind).await?;

        // Validate before touching the existing cache
        let response =
            CaseResponse::from_value(document.clone()).map_err(|source| CacheError::Parse {
                path: self.cache_path(kind),
                source,
            })?;

        self.save(kind, &document)?;
        info!(cache = kind.label(), records = response.data.len(), "Cache refreshed");

        Ok(CacheSnapshot {
            response,
            modified_at: Utc::now(),
            origin: SnapshotOrigin::Fetched,
        })
    }

    /// Load case data for `kind`, refetching when the cache is missing,
    /// unreadable or (unless `offline`) stale.
    ///
    /// A failed refetch switches to offline mode for one more pass, which
    /// serves the cache file regardless of age. Only when that pass finds no
    /// usable file does this return `CacheError::NoData`.
    pub async fn load<S: CaseSource + ?Sized>(
        &self,
        kind: AreaKind,
        offline: bool,
        source: &S,
    ) -> Result<CacheSnapshot, CacheError> {
        let mut offline = offline;
        let mut fetch_failure: Option<CacheError> = None;

        for attempt in 1..=MAX_LOAD_ATTEMPTS {
            let reason = match self.read(kind) {
                Ok(snapshot) if offline || !snapshot.is_stale(self.stale_after) => {
                    return Ok(match fetch_failure {
                        Some(e) => snapshot.with_origin(SnapshotOrigin::StaleFallback {
                            reason: e.to_string(),
                        }),
                        None => snapshot,
                    });
                }
                Ok(snapshot) => {
                    info!(cache = kind.label(), age = %snapshot.age_display(), "Reacquiring stale data");
                    CacheError::Stale {
                        age: snapshot.age_display(),
                    }
                }
                Err(e) => e,
            };

            match recovery_for(&reason, attempt) {
                Recovery::Refetch => match self.refresh(kind, source).await {
                    Ok(snapshot) => return Ok(snapshot),
                    Err(e) => {
                        warn!(cache = kind.label(), error = %e, "Failed to acquire data, running in offline mode");
                        fetch_failure = Some(e);
                        offline = true;
                    }
                },
                Recovery::Fail => {
                    return Err(CacheError::NoData {
                        path: self.cache_path(kind),
                        reason: fetch_failure.unwrap_or(reason).to_string(),
                    });
                }
            }
        }

        Err(CacheError::NoData {
            path: self.cache_path(kind),
            reason: fetch_failure
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
