//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable overrides for the API endpoint. Overrides are read through a
//! lookup function so callers decide where variables come from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bybit::{ClientConfig, API_BASE_URL};
use crate::fetcher::DEFAULT_PAGE_LIMIT;
use crate::types::FetchRequest;

/// Overrides `api.base_url`
pub const ENV_BASE_URL: &str = "BYBIT_API_BASE_URL";
/// Overrides `api.timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "BYBIT_TIMEOUT_SECS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from JSON file, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        serde_json::from_str(&contents).context("Failed to parse config JSON")
    }

    /// Apply `BYBIT_*` overrides found by `lookup`
    ///
    /// The binary passes `|key| std::env::var(key).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = timeout.parse().with_context(|| {
                format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS)
            })?;
        }
        Ok(())
    }

    /// Reject settings the fetcher cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }
        if self.api.page_limit <= 0 {
            anyhow::bail!("api.page_limit must be greater than 0");
        }
        if self.job.category.trim().is_empty() {
            anyhow::bail!("job.category must not be empty");
        }
        if self.job.symbol.trim().is_empty() {
            anyhow::bail!("job.symbol must not be empty");
        }
        Ok(())
    }

    /// Build the fetch request described by the `job` section
    pub fn fetch_request(&self) -> Result<FetchRequest> {
        FetchRequest::new(
            self.job.category.as_str(),
            self.job.symbol.as_str(),
            self.job.interval.as_str(),
            self.job.start.as_str(),
            self.job.end.as_str(),
        )
        .context("Invalid job parameters")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api.base_url.as_str())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Maximum candles per request
    pub page_limit: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: API_BASE_URL.to_string(),
            timeout_secs: 10,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// What to download
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Market category (e.g. "inverse", "linear", "spot")
    pub category: String,
    pub symbol: String,
    /// Interval code ("1", "5", "60", "D", ...)
    pub interval: String,
    /// "YYYY-MM-DD HH:MM:SS", local time
    pub start: String,
    pub end: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            category: "inverse".to_string(),
            symbol: "BTCUSD".to_string(),
            interval: "D".to_string(),
            start: "2024-12-01 00:00:00".to_string(),
            end: "2024-12-04 00:00:00".to_string(),
        }
    }
}

/// Where results go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: PathBuf::from("data/raw"),
        }
    }
}
