//! Bybit API types for kline (candlestick) data

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, FetchResult};
use crate::types::Candle;

/// Query parameters for one kline page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlineQuery {
    pub category: String,
    pub symbol: String,
    pub interval: String,
    /// Unix seconds
    pub start: i64,
    /// Number of candles requested
    pub limit: i64,
}

/// Response envelope returned by `/v5/market/kline`
///
/// ```json
/// {"retCode": 0, "retMsg": "OK", "result": {"list": [["1670608800000", "17071", ...]]}}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KlineResponse {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: KlineResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KlineResult {
    #[serde(default)]
    pub list: Vec<Vec<serde_json::Value>>,
}

impl KlineResponse {
    /// Successful envelope wrapping the given rows
    pub fn ok(list: Vec<Vec<serde_json::Value>>) -> Self {
        KlineResponse {
            ret_code: 0,
            ret_msg: "OK".to_string(),
            result: KlineResult { list },
        }
    }

    /// Envelope carrying an API-level failure
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        KlineResponse {
            ret_code: code,
            ret_msg: message.into(),
            result: KlineResult::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.ret_code == 0
    }

    /// Check `retCode` and convert the page rows to candles
    pub fn into_candles(self) -> FetchResult<Vec<Candle>> {
        if !self.is_success() {
            let message = if self.ret_msg.is_empty() {
                "Unknown error from API.".to_string()
            } else {
                self.ret_msg
            };
            return Err(FetchError::Api {
                code: self.ret_code,
                message,
            });
        }

        self.result
            .list
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Candle::from_raw(row).ok_or_else(|| {
                    FetchError::MalformedResponse(format!(
                        "row {} has {} fields, expected {}",
                        i,
                        row.len(),
                        Candle::ARITY
                    ))
                })
            })
            .collect()
    }
}
