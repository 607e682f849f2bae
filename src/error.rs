//! Error types for kline fetching and CSV output

use thiserror::Error;

/// Errors raised while fetching or writing kline data
///
/// None of these are recovered inside the library: any failure aborts the
/// whole multi-page fetch and no partial rows are returned.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid date format: '{value}', expected 'YYYY-MM-DD HH:MM:SS'")]
    InvalidDateFormat { value: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("API error: {message} (retCode {code})")]
    Api { code: i64, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl FetchError {
    /// True for the variants raised before any network activity
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::InvalidDateFormat { .. }
        )
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
