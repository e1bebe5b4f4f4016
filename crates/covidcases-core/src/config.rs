//! Application configuration management.
//!
//! This module handles loading the application configuration: where case
//! documents are cached, where the EER/LAD GeoJSON files live, which API
//! endpoint to query and how old a cache may get before it is refetched.
//!
//! Configuration is stored at `~/.config/covidcases/config.json`. Every field
//! is optional, and `COVIDCASES_*` environment variables override the file.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::api::API_BASE_URL;
use crate::cache::DEFAULT_STALE_AFTER_DAYS;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "covidcases";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// GeoJSON files are looked up next to the working directory by default
const DEFAULT_GEOJSON_DIR: &str = "..";

pub const ENV_CACHE_DIR: &str = "COVIDCASES_CACHE_DIR";
pub const ENV_GEOJSON_DIR: &str = "COVIDCASES_GEOJSON_DIR";
pub const ENV_API_URL: &str = "COVIDCASES_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub cache_dir: Option<PathBuf>,
    pub geojson_dir: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub stale_after_days: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `COVIDCASES_*` overrides from an environment lookup
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var(ENV_CACHE_DIR) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = var(ENV_GEOJSON_DIR) {
            self.geojson_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = var(ENV_API_URL) {
            self.api_base_url = Some(url);
        }
        self
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn geojson_dir(&self) -> PathBuf {
        self.geojson_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GEOJSON_DIR))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(API_BASE_URL)
    }

    /// Age after which a cache file is refetched. Non-positive values fall
    /// back to the default.
    pub fn stale_after(&self) -> Duration {
        let days = self
            .stale_after_days
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_STALE_AFTER_DAYS);
        Duration::days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), API_BASE_URL);
        assert_eq!(config.geojson_dir(), PathBuf::from(".."));
        assert_eq!(config.stale_after(), Duration::days(2));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_CACHE_DIR, "/tmp/cases"),
            (ENV_API_URL, "http://localhost:8080/v1/data"),
        ]
        .into_iter()
        .collect();
        let config = Config::default().with_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/cases"));
        assert_eq!(config.api_base_url(), "http://localhost:8080/v1/data");
        assert_eq!(config.geojson_dir(), PathBuf::from(".."));
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = serde_json::from_str(r#"{"stale_after_days": 7}"#).unwrap();
        assert_eq!(config.stale_after(), Duration::days(7));
        assert!(config.cache_dir.is_none());

        let config: Config = serde_json::from_str(r#"{"stale_after_days": 0}"#).unwrap();
        assert_eq!(config.stale_after(), Duration::days(2));
    }
}
