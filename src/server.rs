//! HTTP surface for the interaction webhook.
//!
//! Mounts `POST /interactions` and a `GET /health` liveness probe behind
//! an axum router. Routing logic lives in [`crate::router`]; this module
//! only adapts it to HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::router::route_interaction;
use crate::state::AppState;
use crate::{AppError, Result};

/// Handler for `GET /health` — returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

async fn interactions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let reply = route_interaction(&state, &headers, &body).await;
    (reply.status, Json(reply.body))
}

/// Build the webhook router.
#[must_use]
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/interactions", post(interactions))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve the webhook on `config.http_port` until the token is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the listener fails to bind, and
/// `AppError::Io` if serving fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let port = state.config.http_port;
    let bind = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind {bind}: {err}")))?;
    info!(%bind, "interaction webhook listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(err.to_string()))
}
