use crate::api::coingecko::CoinGeckoClient;
use crate::models::LiveSource;
use crate::services::cache_service::PriceCache;
use crate::services::price_service::PriceFeed;
use crate::services::view_service::ViewController;
use crate::utils::retry::RetryPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Server configuration derived from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    /// `PORT`, as in most hosting platforms
    pub port: u16,

    // ── Upstream ───────────────────────────────────────────────────
    pub coingecko_base_url: String,
    pub retry: RetryPolicy,

    // ── Proxy cache ────────────────────────────────────────────────
    pub price_cache_ttl: Duration,

    // ── Dashboard ──────────────────────────────────────────────────
    pub price_feed: PriceFeed,
    pub live_source: LiveSource,
    pub status_revert: Duration,
    pub static_dir: PathBuf,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_millis(name: &str, default: u64) -> Duration {
    Duration::from_millis(
        env::var(name)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(default),
    )
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_u16("PORT", 3000);

        let live_source = env_str("LIVE_SOURCE", "spot").parse().unwrap_or_else(|e| {
            warn!("{}; falling back to spot", e);
            LiveSource::Spot
        });

        let price_feed = match env_str("PRICE_FEED", "direct").to_lowercase().as_str() {
            "proxy" => PriceFeed::Proxy {
                base_url: env_str("PROXY_BASE_URL", &format!("http://127.0.0.1:{}", port))
                    .trim_end_matches('/')
                    .to_string(),
            },
            "direct" => PriceFeed::Direct,
            other => {
                warn!("Unknown PRICE_FEED '{}'; using direct", other);
                PriceFeed::Direct
            }
        };

        Self {
            bind: env_str("BIND_ADDR", "0.0.0.0"),
            port,
            coingecko_base_url: env_str("COINGECKO_BASE_URL", CoinGeckoClient::DEFAULT_BASE_URL),
            retry: RetryPolicy::new(
                env_u32("FETCH_MAX_ATTEMPTS", 3),
                env_millis("FETCH_RETRY_DELAY_MS", 1000),
            ),
            price_cache_ttl: env_millis("PRICE_CACHE_TTL_MS", PriceCache::DEFAULT_TTL.as_millis() as u64),
            price_feed,
            live_source,
            status_revert: env_millis(
                "STATUS_REVERT_MS",
                ViewController::DEFAULT_REVERT_DELAY.as_millis() as u64,
            ),
            static_dir: PathBuf::from(env_str("STATIC_DIR", "static")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            coingecko_base_url: CoinGeckoClient::DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            price_cache_ttl: PriceCache::DEFAULT_TTL,
            price_feed: PriceFeed::Direct,
            live_source: LiveSource::Spot,
            status_revert: ViewController::DEFAULT_REVERT_DELAY,
            static_dir: PathBuf::from("static"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.retry, RetryPolicy::new(3, Duration::from_millis(1000)));
        assert_eq!(config.price_cache_ttl, Duration::from_millis(30_000));
        assert_eq!(config.status_revert, Duration::from_millis(3000));
        assert_eq!(config.price_feed, PriceFeed::Direct);
    }

    #[test]
    fn test_env_helpers_fall_back_on_garbage() {
        // Names unique to this test so parallel tests do not interfere
        env::set_var("BTC_TICKER_TEST_PORT", "not-a-port");
        env::set_var("BTC_TICKER_TEST_DELAY", " 250 ");
        env::set_var("BTC_TICKER_TEST_BLANK", "   ");

        assert_eq!(env_u16("BTC_TICKER_TEST_PORT", 3000), 3000);
        assert_eq!(env_millis("BTC_TICKER_TEST_DELAY", 1000), Duration::from_millis(250));
        assert_eq!(env_str("BTC_TICKER_TEST_BLANK", "fallback"), "fallback");
    }
}
