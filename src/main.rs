use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use config::AppConfig;
use models::View;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("btc_ticker=debug,tower_http=info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🚀 Initializing Bitcoin price tracker...");

    let config = AppConfig::from_env();
    info!("📊 Using {} (retry: {} attempts, {:?} apart)",
        config.coingecko_base_url, config.retry.max_attempts, config.retry.delay);

    match once_view() {
        Ok(Some(view)) => return run_once(config, view).await,
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            return;
        }
    }

    let addr: SocketAddr = match format!("{}:{}", config.bind, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid bind address {}:{}: {}", config.bind, config.port, e);
            return;
        }
    };

    let state = AppState::new(config);
    let app = routes::app_router(Arc::clone(&state));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("Server running on http://{}", addr);

    // The 30-day view is the initial state of the dashboard
    let controller = Arc::clone(&state.controller);
    tokio::spawn(async move {
        info!("📈 Loading default view (30 days)...");
        controller.show_history().await;
    });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

/// `--once <live|history>`: render a single view to stdout and exit
fn once_view() -> Result<Option<View>, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [flag, view] if flag == "--once" => view.parse().map(Some),
        [flag] if flag == "--once" => Ok(Some(View::History)),
        other => Err(format!("Unknown arguments {:?}. Usage: btc-ticker [--once live|history]", other)),
    }
}

async fn run_once(config: AppConfig, view: View) {
    let state = AppState::new(config);
    state.controller.show(view).await;

    let document = state.controller.snapshot().await;
    if let Some(status) = &document.status {
        println!("{}", status.text);
    }
    match &document.table_body {
        Some(body) if !body.rows.is_empty() => {
            println!("{}", services::table_service::render_text(&body.rows));
        }
        _ => warn!("Nothing to display"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        // Without a signal handler, run until killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, gracefully stopping…");
}
