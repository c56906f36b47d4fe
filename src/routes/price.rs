use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::error;

use crate::api::coingecko::{ChartInterval, SOURCE_NAME};
use crate::error::ApiError;
use crate::models::{Cached, LivePriceResult};
use crate::services::normalize_service::normalize;
use crate::state::AppState;
use crate::utils::format::format_minute_utc;
use crate::utils::retry::RetryPolicy;

/// Currencies quoted by `/price`
const SPOT_CURRENCIES: [&str; 3] = ["usd", "eur", "gbp"];
const HISTORY_DAYS: u32 = 30;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/price", get(live_price))
        .route("/history", get(history))
}

/// GET /price — spot price in USD/EUR/GBP, cached for the configured TTL.
///
/// One upstream attempt per cache miss; retrying is left to the caller.
async fn live_price(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let upstream = Arc::clone(&state.upstream);

    let result = state
        .price_cache
        .get_or_fetch(|| async move { upstream.spot_price(&SPOT_CURRENCIES, &RetryPolicy::once()).await })
        .await
        .map_err(|e| {
            error!("Error in /price route: {}", e);
            ApiError::new("Failed to fetch price", e)
        })?;

    Ok(Json(price_body(&result)))
}

fn price_body(result: &Cached<LivePriceResult>) -> Value {
    let bitcoin: Map<String, Value> = result
        .value
        .prices_by_currency
        .iter()
        .map(|(code, rate)| (code.clone(), json!({ "code": code, "rate_float": rate })))
        .collect();

    json!({
        "cached": result.cached,
        "source": result.value.source,
        "updatedAtISO": result.value.updated_at_iso,
        "bitcoin": bitcoin,
    })
}

/// GET /history — 30 days of hourly USD prices
async fn history(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let fail = |e: &dyn std::fmt::Display| {
        error!("Error in /history route: {}", e);
        ApiError::new("Failed to fetch history", e)
    };

    let raw = state
        .upstream
        .market_chart(HISTORY_DAYS, ChartInterval::Hourly, &RetryPolicy::once())
        .await
        .map_err(|e| fail(&e))?;
    let series = normalize(&raw).map_err(|e| fail(&e))?;

    let bpi: Vec<Value> = series
        .iter()
        .map(|p| json!({ "date": format_minute_utc(p.timestamp_millis()), "price": p.price() }))
        .collect();

    Ok(Json(json!({
        "source": SOURCE_NAME,
        "currency": "USD",
        "bpi": bpi,
    })))
}
