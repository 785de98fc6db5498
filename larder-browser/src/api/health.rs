//! Liveness probe for the browser service
//!
//! Always answers 200; `store` reports whether the local SQLite store
//! responds so a monitor can tell a degraded service from a dead one.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, store) = match state.browser.store().ping().await {
        Ok(()) => ("ok", "ok"),
        Err(e) => {
            warn!(error = %e, "Local store did not answer health check");
            ("degraded", "unavailable")
        }
    };

    Json(HealthResponse {
        status,
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
