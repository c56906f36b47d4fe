use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Response of `GET /simple/price?ids=bitcoin&vs_currencies=...`
#[derive(Debug, Clone, Deserialize)]
pub struct SimplePriceResponse {
    /// Lower-case currency code → rate
    pub bitcoin: BTreeMap<String, f64>,
}

/// Sampling interval for `/coins/bitcoin/market_chart`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartInterval {
    /// Let the API pick (5-minute for 1 day, hourly up to 90 days)
    Auto,
    Hourly,
    Daily,
}

impl ChartInterval {
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            ChartInterval::Auto => None,
            ChartInterval::Hourly => Some("hourly"),
            ChartInterval::Daily => Some("daily"),
        }
    }
}

/// Failure of a single upstream request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport level failure (DNS, connect, reset, ...)
    #[error("Network error: {0}")]
    Network(String),
    /// 429 Too Many Requests
    #[error("HTTP 429: rate limit exceeded: {body}")]
    RateLimited { body: String },
    /// Any other non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// 2xx with a body that is not the expected JSON
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}
