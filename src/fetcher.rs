//! Paginated historical kline fetching
//!
//! Splits a `[start, end)` window into pages bounded both by the window and by
//! the per-request row cap, issues them one after another, and concatenates
//! the rows in page order. Any failing page aborts the whole fetch.

use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::bybit::{KlineQuery, KlineResponse};
use crate::data;
use crate::error::{FetchError, FetchResult};
use crate::types::{Candle, FetchRequest, DEFAULT_INTERVAL_SECS};

/// Maximum rows per kline request accepted by the API
pub const DEFAULT_PAGE_LIMIT: i64 = 1000;

/// Something that can answer one kline page request
pub trait KlineSource {
    fn get_klines(&self, query: &KlineQuery) -> FetchResult<KlineResponse>;
}

impl<S: KlineSource + ?Sized> KlineSource for &S {
    fn get_klines(&self, query: &KlineQuery) -> FetchResult<KlineResponse> {
        (**self).get_klines(query)
    }
}

/// Receives the fetcher's warnings and progress
///
/// All methods default to no-ops.
pub trait FetchObserver {
    /// Interval code missing from the table, `fallback_secs` used instead
    fn unknown_interval(&self, _code: &str, _fallback_secs: i64) {}

    /// A page came back with `rows` candles
    fn page_fetched(&self, _query: &KlineQuery, _rows: usize) {}

    /// An empty page ended pagination before the window was covered
    fn exhausted(&self, _cursor: i64, _end: i64) {}

    fn completed(&self, _total: usize) {}
}

/// Forwards fetcher events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn unknown_interval(&self, code: &str, fallback_secs: i64) {
        warn!(
            "Unknown interval '{}'. Defaulting to 'D' ({} seconds).",
            code, fallback_secs
        );
    }

    fn page_fetched(&self, query: &KlineQuery, rows: usize) {
        debug!(
            "Page start={} limit={} returned {} candles",
            query.start, query.limit, rows
        );
    }

    fn exhausted(&self, cursor: i64, end: i64) {
        info!(
            "No more data available for the given range (stopped at {} of {}).",
            cursor, end
        );
    }

    fn completed(&self, total: usize) {
        info!("Fetched {} candlesticks.", total);
    }
}

/// Fetch historical klines over an arbitrary window
///
/// Window bounds are read in `Tz`, the machine's local zone by default.
pub struct HistoricalPriceFetcher<S, Tz: TimeZone = Local> {
    source: S,
    observer: Box<dyn FetchObserver>,
    page_limit: i64,
    timezone: Tz,
}

impl<S: KlineSource> HistoricalPriceFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            observer: Box::new(TracingObserver),
            page_limit: DEFAULT_PAGE_LIMIT,
            timezone: Local,
        }
    }
}

impl<S: KlineSource, Tz: TimeZone> HistoricalPriceFetcher<S, Tz> {
    /// Read window bounds in `timezone` instead of local time
    pub fn with_timezone<T: TimeZone>(self, timezone: T) -> HistoricalPriceFetcher<S, T> {
        HistoricalPriceFetcher {
            source: self.source,
            observer: self.observer,
            page_limit: self.page_limit,
            timezone,
        }
    }

    /// Replace the default `TracingObserver`
    pub fn with_observer(mut self, observer: impl FetchObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Set the maximum number of candles requested per page
    pub fn with_page_limit(mut self, page_limit: i64) -> FetchResult<Self> {
        if page_limit <= 0 {
            return Err(FetchError::InvalidParameter(format!(
                "page limit must be positive, got {}",
                page_limit
            )));
        }
        self.page_limit = page_limit;
        Ok(self)
    }

    /// Seconds per candle for the request, reporting the fallback if unknown
    fn seconds_per_candle(&self, request: &FetchRequest) -> i64 {
        match request.interval().seconds() {
            Some(secs) => secs,
            None => {
                self.observer
                    .unknown_interval(request.interval().as_str(), DEFAULT_INTERVAL_SECS);
                DEFAULT_INTERVAL_SECS
            }
        }
    }

    /// Fetch every candle in the request window
    ///
    /// Returns an empty vector without touching the network when
    /// `start >= end`.
    pub fn fetch(&self, request: &FetchRequest) -> FetchResult<Vec<Candle>> {
        let start_timestamp = request.start_timestamp_in(&self.timezone)?;
        let end_timestamp = request.end_timestamp_in(&self.timezone)?;
        let seconds_per_candle = self.seconds_per_candle(request);

        let mut all_candles: Vec<Candle> = Vec::new();
        let mut cursor = start_timestamp;

        while cursor < end_timestamp {
            let batch_end = cursor
                .saturating_add(self.page_limit.saturating_mul(seconds_per_candle))
                .min(end_timestamp);

            let query = KlineQuery {
                category: request.category().to_string(),
                symbol: request.symbol().to_string(),
                interval: request.interval().as_str().to_string(),
                start: cursor,
                limit: (batch_end - cursor) / seconds_per_candle,
            };

            let candles = self.source.get_klines(&query)?.into_candles()?;
            self.observer.page_fetched(&query, candles.len());

            if candles.is_empty() {
                self.observer.exhausted(cursor, end_timestamp);
                break;
            }

            all_candles.extend(candles);
            cursor = batch_end;
        }

        self.observer.completed(all_candles.len());
        Ok(all_candles)
    }

    /// Fetch the window and write it to `directory`
    ///
    /// The file is named by [`data::output_filename`]. Nothing is written if
    /// the fetch fails.
    pub fn fetch_to_csv(
        &self,
        request: &FetchRequest,
        directory: impl AsRef<Path>,
    ) -> FetchResult<PathBuf> {
        let candles = self.fetch(request)?;
        data::save_to_csv(&candles, directory, &data::output_filename(request))
    }
}
