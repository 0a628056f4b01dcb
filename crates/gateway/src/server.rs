//! HTTP server assembly.

use {
    axum::{
        Json, Router,
        response::IntoResponse,
        routing::{get, post},
    },
    std::{net::SocketAddr, sync::Arc},
    tracing::info,
};

use crate::{state::AppState, webhook::callback_handler};

/// Build the relay router.
///
/// Split from [`serve`] so integration tests can drive the app on an
/// ephemeral port.
#[must_use]
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/callback", post(callback_handler))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "pipesage gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
