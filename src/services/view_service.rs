use crate::models::{Document, StatusLine, StatusStyle, View};
use crate::models::dashboard::STATUS_TARGET;
use crate::services::price_service::{Loaded, PriceService};
use crate::services::{chart_service, table_service};
use crate::utils::errors::RenderError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Drives the dashboard: one trigger per view, each running
/// fetch → normalize → status → table → chart in order.
///
/// Overlapping triggers are not cancelled. Every trigger takes a new
/// generation number and only the latest generation may touch the document,
/// so an older request finishing last is dropped instead of overwriting
/// newer content.
pub struct ViewController {
    prices: PriceService,
    document: Arc<Mutex<Document>>,
    generation: AtomicU64,
    pending_revert: StdMutex<Option<JoinHandle<()>>>,
    revert_delay: Duration,
}

impl ViewController {
    pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(3000);

    pub fn new(prices: PriceService, revert_delay: Duration) -> Self {
        Self::with_document(prices, Document::standard(), revert_delay)
    }

    pub fn with_document(prices: PriceService, document: Document, revert_delay: Duration) -> Self {
        Self {
            prices,
            document: Arc::new(Mutex::new(document)),
            generation: AtomicU64::new(0),
            pending_revert: StdMutex::new(None),
            revert_delay,
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> Document {
        self.document.lock().await.clone()
    }

    pub async fn show_live(&self) {
        self.show(View::Live).await
    }

    pub async fn show_history(&self) {
        self.show(View::History).await
    }

    /// Run one trigger to completion. Never fails: every error ends up in
    /// the status line or the log.
    pub async fn show(&self, view: View) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending_revert();
        info!("📈 Loading {} view (request #{})", view.name(), generation);

        {
            let mut document = self.document.lock().await;
            let loading = match view {
                View::Live => "Loading live price…",
                View::History => "Loading last 30 days…",
            };
            if let Err(e) = set_status(&mut document, loading, StatusStyle::Normal) {
                error!("{}", e);
                return;
            }
        }

        let outcome = self.prices.load(view).await;

        let mut document = self.document.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale {} result (request #{})", view.name(), generation);
            return;
        }

        match outcome {
            Ok(loaded) => {
                if let Err(e) = present(&mut document, &loaded) {
                    error!("Rendering {} view aborted: {}", view.name(), e);
                }
            }
            Err(e) => {
                error!("Failed to load {} view: {}", view.name(), e);
                if let Err(e) = set_status(&mut document, &e.user_message(view), StatusStyle::Error) {
                    error!("{}", e);
                    return;
                }
                drop(document);
                self.schedule_revert();
            }
        }
    }

    /// Whether an error style is waiting to be reverted
    pub fn has_pending_revert(&self) -> bool {
        self.pending_revert
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Put the status style back to normal after the revert delay. Only the
    /// style reverts, the error text stays.
    fn schedule_revert(&self) {
        let document = Arc::clone(&self.document);
        let delay = self.revert_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut document = document.lock().await;
            if let Some(status) = document.status.as_mut() {
                status.style = StatusStyle::Normal;
            }
        });

        let mut pending = self.pending_revert.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending_revert(&self) {
        let mut pending = self.pending_revert.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.cancel_pending_revert();
    }
}

fn set_status(document: &mut Document, text: &str, style: StatusStyle) -> Result<(), RenderError> {
    let status = document
        .status
        .as_mut()
        .ok_or(RenderError::TargetMissing(STATUS_TARGET))?;
    *status = StatusLine {
        text: text.to_string(),
        style,
    };
    Ok(())
}

fn present(document: &mut Document, loaded: &Loaded) -> Result<(), RenderError> {
    set_status(document, &loaded.summary, StatusStyle::Normal)?;
    table_service::render(&loaded.series, document)?;
    chart_service::render(&loaded.series, &loaded.title, loaded.mode, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::coingecko::CoinGeckoClient;
    use crate::models::{Delta, LiveSource, ViewMode};
    use crate::services::price_service::PriceFeed;
    use crate::utils::mock_upstream::spawn_mock;
    use crate::utils::retry::RetryPolicy;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use regex::Regex;
    use serde_json::json;

    async fn controller(router: Router, document: Document, revert_delay: Duration) -> ViewController {
        let base = spawn_mock(router).await;
        let client = Arc::new(CoinGeckoClient::with_base_url(base, RetryPolicy::once()));
        let prices = PriceService::new(client, PriceFeed::Direct, LiveSource::Spot);
        ViewController::with_document(prices, document, revert_delay)
    }

    fn three_day_history() -> Router {
        Router::new().route(
            "/coins/bitcoin/market_chart",
            get(|| async {
                Json(json!({ "prices": [
                    [1700000000000i64, 36500.0],
                    [1700086400000i64, 36400.0],
                    [1700172800000i64, 37000.0]
                ] }))
            }),
        )
    }

    fn rate_limited() -> Router {
        Router::new()
            .route("/coins/bitcoin/market_chart", get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }))
            .route("/simple/price", get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }))
    }

    #[tokio::test]
    async fn test_show_history_end_to_end() {
        let vc = controller(three_day_history(), Document::standard(), ViewController::DEFAULT_REVERT_DELAY).await;
        vc.show_history().await;

        let document = vc.snapshot().await;
        let rows = document.table_body.unwrap().rows;
        assert_eq!(rows.len(), 3);
        assert!(rows[0].label < rows[1].label && rows[1].label < rows[2].label);
        assert_eq!(
            rows.iter().map(|r| r.delta).collect::<Vec<_>>(),
            vec![Delta::Neutral, Delta::Down, Delta::Up]
        );

        let chart = document.chart_canvas.unwrap().chart.unwrap();
        assert_eq!(chart.mode, ViewMode::HistoryShort);
        assert_eq!(chart.points.len(), 3);
        let short = Regex::new(r"^[A-Z][a-z]{2} \d{1,2}$").unwrap();
        assert!(chart.points.iter().all(|p| short.is_match(&p.label)));
        let chart_ts: Vec<i64> = chart.points.iter().map(|p| p.timestamp_millis).collect();
        assert_eq!(chart_ts, vec![1_700_000_000_000, 1_700_086_400_000, 1_700_172_800_000]);

        let status = document.status.unwrap();
        assert_eq!(status.style, StatusStyle::Normal);
        assert!(status.text.starts_with("Source: CoinGecko | Range: "));
    }

    #[tokio::test]
    async fn test_show_live_single_point() {
        let router = Router::new().route("/simple/price", get(|| async { Json(json!({ "bitcoin": { "usd": 36512.5 } })) }));
        let vc = controller(router, Document::standard(), ViewController::DEFAULT_REVERT_DELAY).await;
        vc.show_live().await;

        let document = vc.snapshot().await;
        assert_eq!(document.table_body.unwrap().rows.len(), 1);
        let chart = document.chart_canvas.unwrap().chart.unwrap();
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.mode, ViewMode::Live);
    }

    #[tokio::test]
    async fn test_error_sets_message_and_reverts_style() {
        let vc = controller(rate_limited(), Document::standard(), Duration::from_millis(50)).await;
        vc.show_history().await;

        let status = vc.snapshot().await.status.unwrap();
        assert_eq!(status.style, StatusStyle::Error);
        assert_eq!(
            status.text,
            "Error loading history: Rate limit exceeded. Please wait a moment and try again."
        );
        assert!(vc.has_pending_revert());

        tokio::time::sleep(Duration::from_millis(300)).await;

        let status = vc.snapshot().await.status.unwrap();
        assert_eq!(status.style, StatusStyle::Normal);
        assert!(status.text.contains("Rate limit exceeded"));
        assert!(!vc.has_pending_revert());
    }

    #[tokio::test]
    async fn test_new_trigger_cancels_pending_revert() {
        let vc = controller(rate_limited(), Document::standard(), Duration::from_secs(60)).await;
        vc.show_live().await;
        assert!(vc.has_pending_revert());

        vc.show_history().await;
        // The second failure schedules its own revert; the first one is gone
        assert!(vc.has_pending_revert());
        assert_eq!(vc.snapshot().await.status.unwrap().style, StatusStyle::Error);

        vc.cancel_pending_revert();
        assert!(!vc.has_pending_revert());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_content() {
        let router = three_day_history().route(
            "/simple/price",
            get(|| async { Json(json!({ "bitcoin": {} })) }),
        );
        let vc = controller(router, Document::standard(), Duration::from_millis(10)).await;

        vc.show_history().await;
        vc.show_live().await;

        let document = vc.snapshot().await;
        assert_eq!(document.table_body.unwrap().rows.len(), 3);
        assert!(document.status.unwrap().text.starts_with("Error loading live data: "));
    }

    #[tokio::test]
    async fn test_missing_target_aborts_quietly() {
        let document = Document {
            chart_canvas: None,
            ..Document::standard()
        };
        let vc = controller(three_day_history(), document, ViewController::DEFAULT_REVERT_DELAY).await;
        vc.show_history().await;

        let document = vc.snapshot().await;
        // Status and table rendered before the chart target turned out to be missing
        assert_eq!(document.table_body.unwrap().rows.len(), 3);
        assert!(document.status.unwrap().text.starts_with("Source: CoinGecko"));
        assert!(!vc.has_pending_revert());
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let router = Router::new()
            .route(
                "/coins/bitcoin/market_chart",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Json(json!({ "prices": [[1700000000000i64, 1.0], [1700086400000i64, 2.0]] }))
                }),
            )
            .route("/simple/price", get(|| async { Json(json!({ "bitcoin": { "usd": 3.0 } })) }));
        let vc = Arc::new(controller(router, Document::standard(), ViewController::DEFAULT_REVERT_DELAY).await);

        let slow = {
            let vc = Arc::clone(&vc);
            tokio::spawn(async move { vc.show_history().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        vc.show_live().await;
        slow.await.unwrap();

        let document = vc.snapshot().await;
        let chart = document.chart_canvas.unwrap().chart.unwrap();
        assert_eq!(chart.mode, ViewMode::Live);
        assert_eq!(chart.points.len(), 1);
        assert_eq!(document.table_body.unwrap().rows[0].price, 3.0);
    }
}
