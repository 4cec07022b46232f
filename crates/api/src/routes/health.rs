//! Health check endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::AppState;
use crate::error::report_error_response;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Readiness response.
#[derive(Serialize)]
pub struct ReadyResponse {
    /// Service status.
    pub status: &'static str,
    /// Revision of the ledger snapshot currently served.
    pub revision: u64,
}

/// Liveness handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness handler: succeeds once a ledger snapshot can be taken.
async fn ready_check(State(state): State<AppState>) -> Response {
    match state.reports.snapshot_revision().await {
        Ok(revision) => Json(ReadyResponse {
            status: "ready",
            revision,
        })
        .into_response(),
        Err(err) => report_error_response(err),
    }
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(ready_check))
}
