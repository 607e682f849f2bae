//! Core data types for kline fetching

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, FetchResult};

/// Date-time format accepted for the start and end of a fetch window
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Duration used when an interval code is not in the table (one day)
pub const DEFAULT_INTERVAL_SECS: i64 = 86_400;

/// Interval code -> seconds per candle
const INTERVAL_SECONDS: &[(&str, i64)] = &[
    ("1", 60),
    ("3", 180),
    ("5", 300),
    ("15", 900),
    ("30", 1_800),
    ("60", 3_600),
    ("120", 7_200),
    ("240", 14_400),
    ("360", 21_600),
    ("720", 43_200),
    ("D", 86_400),
    ("W", 604_800),
    ("M", 2_592_000),
];

/// Candle interval as understood by the kline endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interval {
    Min1,
    Min3,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour12,
    Day,
    Week,
    Month,
    /// Code outside the table, sent upstream unchanged
    Unknown(String),
}

impl Interval {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Min1 => "1",
            Self::Min3 => "3",
            Self::Min5 => "5",
            Self::Min15 => "15",
            Self::Min30 => "30",
            Self::Hour1 => "60",
            Self::Hour2 => "120",
            Self::Hour4 => "240",
            Self::Hour6 => "360",
            Self::Hour12 => "720",
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
            Self::Unknown(code) => code,
        }
    }

    /// Seconds per candle, `None` for codes outside the table
    pub fn seconds(&self) -> Option<i64> {
        let code = self.as_str();
        INTERVAL_SECONDS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, secs)| *secs)
    }
}

impl From<&str> for Interval {
    /// Exact match only, so `" D"` stays `Unknown(" D")`
    fn from(code: &str) -> Self {
        match code {
            "1" => Self::Min1,
            "3" => Self::Min3,
            "5" => Self::Min5,
            "15" => Self::Min15,
            "30" => Self::Min30,
            "60" => Self::Hour1,
            "120" => Self::Hour2,
            "240" => Self::Hour4,
            "360" => Self::Hour6,
            "720" => Self::Hour12,
            "D" => Self::Day,
            "W" => Self::Week,
            "M" => Self::Month,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Interval {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One kline row, passed through verbatim from the API
///
/// Field order matches the upstream array:
/// `[openTime, open, high, low, close, volume, turnover]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "timestamp")]
    pub open_time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub turnover: String,
}

impl Candle {
    /// Number of fields in an upstream kline row
    pub const ARITY: usize = 7;

    /// Build from a raw JSON row, `None` unless it has exactly seven fields
    pub fn from_raw(raw: &[serde_json::Value]) -> Option<Self> {
        if raw.len() != Self::ARITY {
            return None;
        }

        let field = |i: usize| match &raw[i] {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Some(Candle {
            open_time: field(0),
            open: field(1),
            high: field(2),
            low: field(3),
            close: field(4),
            volume: field(5),
            turnover: field(6),
        })
    }
}

/// One logical fetch job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    category: String,
    symbol: String,
    interval: Interval,
    start: String,
    end: String,
    start_dt: NaiveDateTime,
    end_dt: NaiveDateTime,
}

impl FetchRequest {
    /// Validate and build a request
    ///
    /// `start` and `end` must match [`DATE_FORMAT`] exactly and are read as
    /// naive local times.
    pub fn new(
        category: impl Into<String>,
        symbol: impl Into<String>,
        interval: impl Into<Interval>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> FetchResult<Self> {
        let category = category.into();
        let symbol = symbol.into();
        let start = start.into();
        let end = end.into();

        if category.trim().is_empty() {
            return Err(FetchError::InvalidParameter(
                "category must not be empty".to_string(),
            ));
        }
        if symbol.trim().is_empty() {
            return Err(FetchError::InvalidParameter(
                "symbol must not be empty".to_string(),
            ));
        }

        let start_dt = parse_datetime(&start)?;
        let end_dt = parse_datetime(&end)?;

        Ok(Self {
            category,
            symbol,
            interval: interval.into(),
            start,
            end,
            start_dt,
            end_dt,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Start as given by the caller
    pub fn start(&self) -> &str {
        &self.start
    }

    /// End as given by the caller
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Start in Unix seconds, read as local time
    pub fn start_timestamp(&self) -> FetchResult<i64> {
        self.start_timestamp_in(&Local)
    }

    /// End in Unix seconds, read as local time
    pub fn end_timestamp(&self) -> FetchResult<i64> {
        self.end_timestamp_in(&Local)
    }

    pub fn start_timestamp_in<Tz: TimeZone>(&self, timezone: &Tz) -> FetchResult<i64> {
        to_unix_timestamp(timezone, &self.start, self.start_dt)
    }

    pub fn end_timestamp_in<Tz: TimeZone>(&self, timezone: &Tz) -> FetchResult<i64> {
        to_unix_timestamp(timezone, &self.end, self.end_dt)
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string, no fallback formats
pub fn parse_datetime(value: &str) -> FetchResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|_| FetchError::InvalidDateFormat {
        value: value.to_string(),
    })
}

/// Unix seconds for a naive date-time read in `timezone`
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant.
/// Nonexistent ones (DST spring-forward gap) are rejected.
fn to_unix_timestamp<Tz: TimeZone>(
    timezone: &Tz,
    raw: &str,
    naive: NaiveDateTime,
) -> FetchResult<i64> {
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| FetchError::InvalidDateFormat {
            value: raw.to_string(),
        })
}
