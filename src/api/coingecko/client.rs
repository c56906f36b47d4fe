use super::models::{ChartInterval, FetchError, SimplePriceResponse};
use crate::models::LivePriceResult;
use crate::utils::retry::{retry_with_delay, RetryPolicy};
use chrono::{SecondsFormat, Utc};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{error, warn};

/// Display name of the upstream, used in status lines and route payloads
pub const SOURCE_NAME: &str = "CoinGecko";

/// CoinGecko public API client
pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
    retry: RetryPolicy,
}

impl CoinGeckoClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    /// Create a client with custom base URL (proxies, tests)
    pub fn with_base_url(base_url: String, retry: RetryPolicy) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Map a non-2xx response to an error, keeping the body for diagnostics
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> FetchError {
        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        error!("HTTP {}: {}", status_code, body);

        match status_code {
            429 => {
                warn!("Rate limited by upstream");
                FetchError::RateLimited { body }
            }
            _ => FetchError::Status {
                status: status_code,
                body,
            },
        }
    }

    /// One GET, no retry
    async fn get_once(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// GET `url` and parse the body as JSON, retrying per `policy`
    pub async fn fetch_json_with(&self, url: &str, policy: &RetryPolicy) -> Result<Value, FetchError> {
        retry_with_delay(policy, url, |_| self.get_once(url)).await
    }

    /// GET `url` with the client's own retry policy
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_json_with(url, &self.retry).await
    }

    /// GET /simple/price?ids=bitcoin&vs_currencies=...
    pub async fn spot_price(
        &self,
        currencies: &[&str],
        policy: &RetryPolicy,
    ) -> Result<LivePriceResult, FetchError> {
        let vs = currencies
            .iter()
            .map(|c| c.to_lowercase())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/simple/price?ids=bitcoin&vs_currencies={}", self.base_url, vs);

        let raw = self.fetch_json_with(&url, policy).await?;
        let parsed: SimplePriceResponse = serde_json::from_value(raw)
            .map_err(|e| FetchError::Decode(format!("unexpected simple/price payload: {}", e)))?;

        Ok(LivePriceResult {
            source: SOURCE_NAME.to_string(),
            updated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            prices_by_currency: parsed
                .bitcoin
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        })
    }

    /// GET /coins/bitcoin/market_chart, raw JSON (`{ prices: [[ts, price], ...] }`)
    pub async fn market_chart(
        &self,
        days: u32,
        interval: ChartInterval,
        policy: &RetryPolicy,
    ) -> Result<Value, FetchError> {
        let mut url = format!(
            "{}/coins/bitcoin/market_chart?vs_currency=usd&days={}",
            self.base_url, days
        );
        if let Some(interval) = interval.as_query() {
            url.push_str("&interval=");
            url.push_str(interval);
        }

        self.fetch_json_with(&url, policy).await
    }
}
