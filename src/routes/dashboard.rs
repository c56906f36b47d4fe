use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::models::{Document, View};
use crate::services::page_service::render_page;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard.json", get(snapshot))
        .route("/view/{view}", get(show_view))
}

/// GET / — the dashboard as last rendered
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.controller.snapshot().await))
}

/// GET /dashboard.json — the same document, machine readable
async fn snapshot(State(state): State<Arc<AppState>>) -> Json<Document> {
    Json(state.controller.snapshot().await)
}

/// GET /view/{live|history} — fire a trigger, then go back to the page
async fn show_view(State(state): State<Arc<AppState>>, Path(view): Path<String>) -> Response {
    match view.parse::<View>() {
        Ok(view) => {
            state.controller.show(view).await;
            Redirect::to("/").into_response()
        }
        Err(e) => (StatusCode::NOT_FOUND, e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::routes::app_router;
    use crate::state::AppState;
    use crate::utils::mock_upstream::spawn_mock;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn dashboard_server() -> String {
        let upstream = Router::new().route(
            "/coins/bitcoin/market_chart",
            get(|| async {
                Json(json!({ "prices": [
                    [1700000000000i64, 36500.0],
                    [1700086400000i64, 36400.0],
                    [1700172800000i64, 37000.0]
                ] }))
            }),
        );
        let config = AppConfig {
            coingecko_base_url: spawn_mock(upstream).await,
            ..AppConfig::default()
        };
        spawn_mock(app_router(AppState::new(config))).await
    }

    #[tokio::test]
    async fn test_history_trigger_renders_page() {
        let base = dashboard_server().await;

        // reqwest follows the redirect back to "/"
        let response = reqwest::get(format!("{}/view/history", base)).await.unwrap();
        assert_eq!(response.status(), 200);
        let html = response.text().await.unwrap();
        assert!(html.contains("Source: CoinGecko | Range: "));
        assert_eq!(html.matches("<td class=\"date-cell\">").count(), 3);

        let document: Value = reqwest::get(format!("{}/dashboard.json", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(document["table_body"]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(document["chart_canvas"]["chart"]["mode"], "history_short");
        assert_eq!(document["status"]["style"], "normal");
    }

    #[tokio::test]
    async fn test_unknown_view_is_404() {
        let base = dashboard_server().await;
        let response = reqwest::get(format!("{}/view/weekly", base)).await.unwrap();
        assert_eq!(response.status(), 404);
    }
}
