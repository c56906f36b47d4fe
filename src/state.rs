use std::sync::Arc;
use std::time::Instant;

use crate::api::coingecko::CoinGeckoClient;
use crate::config::AppConfig;
use crate::services::cache_service::PriceCache;
use crate::services::price_service::PriceService;
use crate::services::view_service::ViewController;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: AppConfig,
    /// Upstream client used by the proxy routes
    pub upstream: Arc<CoinGeckoClient>,
    /// Spot price cache behind `/price`
    pub price_cache: PriceCache,
    /// Dashboard shown at `/`
    pub controller: Arc<ViewController>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let upstream = Arc::new(CoinGeckoClient::with_base_url(
            config.coingecko_base_url.clone(),
            config.retry,
        ));

        let prices = PriceService::new(
            Arc::clone(&upstream),
            config.price_feed.clone(),
            config.live_source,
        );
        let controller = Arc::new(ViewController::new(prices, config.status_revert));

        Arc::new(Self {
            price_cache: PriceCache::new(config.price_cache_ttl),
            upstream,
            controller,
            started_at: Instant::now(),
            config,
        })
    }
}
