//! Local HTTP server standing in for the price API in tests

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral localhost port, returning its base URL
pub async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock upstream crashed");
    });

    format!("http://{}", addr)
}
