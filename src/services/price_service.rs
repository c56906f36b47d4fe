use crate::api::coingecko::{ChartInterval, CoinGeckoClient, FetchError, SOURCE_NAME};
use crate::models::{LiveSource, PricePoint, Series, View, ViewMode};
use crate::services::normalize_service::{normalize, normalize_spot};
use crate::utils::errors::DataError;
use crate::utils::format::format_long;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Where the dashboard gets its price data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceFeed {
    /// Straight to the upstream API
    Direct,
    /// Through a running instance of this server (`/price`, `/history`)
    Proxy { base_url: String },
}

/// Why a view could not be loaded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl LoadError {
    /// Message shown in the status line
    pub fn user_message(&self, view: View) -> String {
        let prefix = match view {
            View::Live => "Error loading live data: ",
            View::History => "Error loading history: ",
        };
        let reason = match self {
            LoadError::Fetch(e) if e.is_rate_limited() => {
                "Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            LoadError::Fetch(FetchError::Network(_)) => {
                "Network error. Please check your internet connection or try again later.".to_string()
            }
            other => other.to_string(),
        };
        format!("{}{}", prefix, reason)
    }
}

/// A fetched and normalized view, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub series: Series,
    pub title: String,
    pub mode: ViewMode,
    /// Status line text on success
    pub summary: String,
}

/// Fetch + normalize for the two dashboard views
pub struct PriceService {
    client: Arc<CoinGeckoClient>,
    feed: PriceFeed,
    live_source: LiveSource,
}

impl PriceService {
    pub fn new(client: Arc<CoinGeckoClient>, feed: PriceFeed, live_source: LiveSource) -> Self {
        Self {
            client,
            feed,
            live_source,
        }
    }

    pub async fn load(&self, view: View) -> Result<Loaded, LoadError> {
        match view {
            View::Live => self.load_live().await,
            View::History => self.load_history().await,
        }
    }

    async fn load_live(&self) -> Result<Loaded, LoadError> {
        let policy = *self.client.retry_policy();

        let (series, intraday) = match (&self.feed, self.live_source) {
            (PriceFeed::Proxy { base_url }, _) => {
                let raw = self.client.fetch_json(&format!("{}/price", base_url)).await?;
                (normalize_spot(&raw, Utc::now().timestamp_millis())?, false)
            }
            (PriceFeed::Direct, LiveSource::Spot) => {
                let spot = self.client.spot_price(&["usd"], &policy).await?;
                let usd = spot
                    .prices_by_currency
                    .get("USD")
                    .copied()
                    .ok_or_else(|| DataError::Malformed("missing USD rate".to_string()))?;
                let point = PricePoint::new(Utc::now().timestamp_millis(), usd)?;
                (Series::new(vec![point])?, false)
            }
            (PriceFeed::Direct, LiveSource::Intraday) => {
                let raw = self.client.market_chart(1, ChartInterval::Auto, &policy).await?;
                (normalize(&raw)?, true)
            }
        };

        info!("✓ Received {} live data point(s)", series.len());

        let (title, summary) = if intraday {
            (
                "BTC Price (USD) - Last 24 Hours".to_string(),
                format!(
                    "Source: {} | Last 24 Hours ({} points): {} - {} | USD",
                    SOURCE_NAME,
                    series.len(),
                    format_long(series.first().timestamp_millis()),
                    format_long(series.last().timestamp_millis())
                ),
            )
        } else {
            (
                "BTC Price (USD) - Live".to_string(),
                format!(
                    "Source: {} | Updated: {} | USD",
                    SOURCE_NAME,
                    format_long(series.last().timestamp_millis())
                ),
            )
        };

        Ok(Loaded {
            series,
            title,
            mode: ViewMode::Live,
            summary,
        })
    }

    async fn load_history(&self) -> Result<Loaded, LoadError> {
        let raw = match &self.feed {
            PriceFeed::Proxy { base_url } => {
                self.client.fetch_json(&format!("{}/history", base_url)).await?
            }
            PriceFeed::Direct => {
                let policy = *self.client.retry_policy();
                self.client.market_chart(30, ChartInterval::Daily, &policy).await?
            }
        };
        let series = normalize(&raw)?;

        info!("✓ Received {} data points for last 30 days", series.len());

        let summary = format!(
            "Source: {} | Range: {} - {} | USD",
            SOURCE_NAME,
            format_long(series.first().timestamp_millis()),
            format_long(series.last().timestamp_millis())
        );

        Ok(Loaded {
            series,
            title: "BTC Price (USD) - Last 30 Days".to_string(),
            mode: ViewMode::HistoryShort,
            summary,
        })
    }
}
