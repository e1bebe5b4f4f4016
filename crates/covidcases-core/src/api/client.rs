//! API client for the UK coronavirus dashboard REST API.
//!
//! This module provides the `ApiClient` struct for querying daily case and
//! death figures for every area of one granularity.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::models::AreaKind;

use super::{ApiError, CaseSource};

// ============================================================================
// Constants
// ============================================================================

/// Data endpoint of the public case API
pub const API_BASE_URL: &str = "https://api.coronavirus.data.gov.uk/v1/data";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on pages followed for one query. The full LTLA history is a
/// few hundred pages; anything beyond this is a server loop.
const MAX_PAGES: u32 = 2000;

/// Output field name -> API metric, the fixed projection requested for
/// every query.
const STRUCTURE: [(&str, &str); 7] = [
    ("date", "date"),
    ("areaName", "areaName"),
    ("areaCode", "areaCode"),
    ("newCasesBySpecimenDate", "newCasesBySpecimenDate"),
    ("cumCasesBySpecimenDate", "cumCasesBySpecimenDate"),
    ("newDeathsByDeathDate", "newDeaths28DaysByDeathDate"),
    ("cumDeathsByDeathDate", "cumDeaths28DaysByDeathDate"),
];

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next: Option<String>,
}

/// API client for the case data endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    max_pages: u32,
}

impl ApiClient {
    /// Create a client against the public endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a client against another endpoint (mirrors, local test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            max_pages: MAX_PAGES,
        })
    }

    /// Override the page limit for one query
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The `structure` query parameter: the projection as a JSON object
    fn structure() -> String {
        let map: serde_json::Map<String, Value> = STRUCTURE
            .iter()
            .map(|(name, metric)| (name.to_string(), Value::String(metric.to_string())))
            .collect();
        Value::Object(map).to_string()
    }

    fn filters(kind: AreaKind) -> String {
        format!("areaType={}", kind.api_area_type())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch one page. `Ok(None)` means the server has no more content.
    async fn fetch_page(
        &self,
        kind: AreaKind,
        page: u32,
    ) -> Result<Option<(Page, Option<String>)>, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("filters", Self::filters(kind)),
                ("structure", Self::structure()),
                ("format", "json".to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check_response(response).await?;
        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await?;
        let page: Page = serde_json::from_str(&text)?;
        Ok(Some((page, last_modified)))
    }

    /// Fetch every page for one granularity and assemble a single document
    /// `{ data, lastUpdate, length, totalPages }`.
    pub async fn fetch_all(&self, kind: AreaKind) -> Result<Value, ApiError> {
        let mut data = Vec::new();
        let mut last_update = None;
        let mut total_pages = 0;

        for page_number in 1..=self.max_pages {
            let Some((page, last_modified)) = self.fetch_page(kind, page_number).await? else {
                break;
            };
            debug!(
                area = kind.label(),
                page = page_number,
                records = page.data.len(),
                "Fetched case page"
            );

            if last_update.is_none() {
                last_update = last_modified;
            }
            total_pages = page_number;
            data.extend(page.data);

            let has_next = page
                .pagination
                .as_ref()
                .and_then(|p| p.next.as_ref())
                .is_some();
            if !has_next {
                info!(area = kind.label(), records = data.len(), pages = total_pages, "Fetched case data");
                return Ok(Self::assemble(data, last_update, total_pages));
            }
        }

        if total_pages > 0 && total_pages == self.max_pages {
            return Err(ApiError::InvalidResponse(format!(
                "pagination did not end after {} pages",
                self.max_pages
            )));
        }

        info!(area = kind.label(), records = data.len(), pages = total_pages, "Fetched case data");
        Ok(Self::assemble(data, last_update, total_pages))
    }

    fn assemble(data: Vec<Value>, last_update: Option<String>, total_pages: u32) -> Value {
        json!({
            "length": data.len(),
            "totalPages": total_pages,
            "lastUpdate": last_update,
            "data": data,
        })
    }
}

#[async_trait]
impl CaseSource for ApiClient {
    async fn fetch_cases(&self, kind: AreaKind) -> Result<Value, ApiError> {
        self.fetch_all(kind).await
    }
}
