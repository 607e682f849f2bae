//! Bybit API client for fetching historical kline (candlestick) data
//!
//! No API key required for public market data endpoints. Requests are
//! blocking and carry a per-request timeout; nothing is retried.
//!
//! # Example
//! ```no_run
//! use kline_downloader::bybit::{BybitClient, KlineQuery};
//! use kline_downloader::KlineSource;
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = BybitClient::new()?;
//!     let page = client.get_klines(&KlineQuery {
//!         category: "inverse".into(),
//!         symbol: "BTCUSD".into(),
//!         interval: "D".into(),
//!         start: 1_733_011_200,
//!         limit: 3,
//!     })?;
//!     println!("retCode {}, {} rows", page.ret_code, page.result.list.len());
//!     Ok(())
//! }
//! ```

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{KlineQuery, KlineResponse};
use crate::error::FetchResult;
use crate::fetcher::KlineSource;

/// Base URL for Bybit API
pub const API_BASE_URL: &str = "https://api.bybit.com";

/// Path of the public kline endpoint
pub const KLINE_PATH: &str = "/v5/market/kline";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, without trailing slash
    pub base_url: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Point the client at another host (testnet, local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Bybit public market data client
#[derive(Debug, Clone)]
pub struct BybitClient {
    http_client: Client,
    kline_url: String,
}

impl BybitClient {
    /// Create a client against the production API
    pub fn new() -> FetchResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> FetchResult<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(BybitClient {
            http_client,
            kline_url: format!("{}{}", config.base_url, KLINE_PATH),
        })
    }

    /// Full URL of the kline endpoint
    pub fn kline_url(&self) -> &str {
        &self.kline_url
    }
}

impl KlineSource for BybitClient {
    fn get_klines(&self, query: &KlineQuery) -> FetchResult<KlineResponse> {
        debug!(
            "Fetching klines: symbol={}, interval={}, start={}, limit={}",
            query.symbol, query.interval, query.start, query.limit
        );

        let response = self
            .http_client
            .get(&self.kline_url)
            .query(query)
            .send()?
            .error_for_status()?;

        Ok(response.json::<KlineResponse>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BybitClient::new().unwrap();
        assert_eq!(client.kline_url(), "https://api.bybit.com/v5/market/kline");
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:8080/")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));

        let client = BybitClient::with_config(config).unwrap();
        assert_eq!(client.kline_url(), "http://127.0.0.1:8080/v5/market/kline");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(10));
    }
}
