//! HTTP route handlers.

pub mod storage;

use crate::state::AppState;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct RootResponse {
    pub res: &'static str,
}

/// GET / - Service status.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { res: "Operational" })
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/storage/{command}", get(storage::command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
