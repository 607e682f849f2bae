//! Kline Downloader
//!
//! Fetches historical candlestick (OHLCV + turnover) data from the Bybit
//! public REST API over an arbitrary date range, paginating across the
//! per-request row cap, and writes the result to CSV.
//!
//! ```no_run
//! use kline_downloader::{BybitClient, FetchRequest, HistoricalPriceFetcher};
//!
//! fn main() -> anyhow::Result<()> {
//!     let request = FetchRequest::new(
//!         "inverse",
//!         "BTCUSD",
//!         "D",
//!         "2024-12-01 00:00:00",
//!         "2024-12-04 00:00:00",
//!     )?;
//!
//!     let fetcher = HistoricalPriceFetcher::new(BybitClient::new()?);
//!     let path = fetcher.fetch_to_csv(&request, "data/raw")?;
//!     println!("Saved to {}", path.display());
//!     Ok(())
//! }
//! ```

pub mod bybit;
pub mod config;
pub mod data;
pub mod error;
pub mod fetcher;
pub mod types;

#[cfg(test)]
mod testing;

pub use bybit::BybitClient;
pub use config::Config;
pub use error::{FetchError, FetchResult};
pub use fetcher::{FetchObserver, HistoricalPriceFetcher, KlineSource, TracingObserver};
pub use types::*;
