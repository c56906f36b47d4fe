use crate::models::{Cached, LivePriceResult};
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info};

/// Milliseconds since the Unix epoch
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Most recent successful spot price fetch
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: Option<LivePriceResult>,
    pub fetched_at_millis: i64,
    pub ttl_millis: i64,
}

impl CacheEntry {
    fn empty(ttl_millis: i64) -> Self {
        Self {
            value: None,
            fetched_at_millis: 0,
            ttl_millis,
        }
    }

    fn fresh_value(&self, now_millis: i64) -> Option<&LivePriceResult> {
        self.value
            .as_ref()
            .filter(|_| now_millis - self.fetched_at_millis < self.ttl_millis)
    }
}

/// Short-lived cache in front of the upstream spot price.
///
/// The lock covers only the freshness check and the store, never the
/// upstream call. Two requests that both find the entry stale will both
/// fetch, and the later store wins. There is no single-flight coalescing.
pub struct PriceCache {
    entry: RwLock<CacheEntry>,
    clock: Clock,
}

impl PriceCache {
    pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(|| Utc::now().timestamp_millis()))
    }

    pub fn with_clock(ttl: Duration, clock: Clock) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::empty(ttl.as_millis() as i64)),
            clock,
        }
    }

    /// Snapshot of the current entry
    pub fn entry(&self) -> CacheEntry {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Serve the cached value while fresh, otherwise call `loader` once and
    /// store its result. A failing loader leaves the entry untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, loader: F) -> Result<Cached<LivePriceResult>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LivePriceResult, E>>,
    {
        let now = (self.clock)();

        let fresh = {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            entry.fresh_value(now).cloned()
        };
        if let Some(value) = fresh {
            debug!("Serving cached price");
            return Ok(Cached { cached: true, value });
        }

        let value = loader().await?;

        {
            let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
            entry.value = Some(value.clone());
            entry.fetched_at_millis = now;
        }
        info!("Price cache refreshed");

        Ok(Cached { cached: false, value })
    }
}
