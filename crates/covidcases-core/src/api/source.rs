use async_trait::async_trait;

use crate::models::AreaKind;

use super::ApiError;

/// Anything that can produce a raw case document for one granularity.
///
/// The returned value is the document exactly as it should be cached:
/// an object whose `data` key holds the record array.
#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch_cases(&self, kind: AreaKind) -> Result<serde_json::Value, ApiError>;
}
