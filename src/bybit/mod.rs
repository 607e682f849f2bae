//! Bybit API client for downloading historical kline data
//! No API key needed for public market data endpoints.

mod client;
mod types;

pub use client::{BybitClient, ClientConfig, API_BASE_URL, KLINE_PATH};
pub use types::*;
