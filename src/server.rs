//! Metrics endpoint — serves [`OomCounter`] at `GET /metrics`.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use oomx_core::OomCounter;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Build the scrape router. Exposed separately from [`serve`] so it can be
/// driven in-process.
pub fn router(counter: OomCounter) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(counter)
}

async fn metrics(State(counter): State<OomCounter>) -> Response {
    match counter.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, counter.content_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Serve `/metrics` on an already-bound listener until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    counter: OomCounter,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "serving metrics");
    }
    axum::serve(listener, router(counter))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
}

/// Bind `0.0.0.0:port`.
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}
