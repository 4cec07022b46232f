//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for every report
//! - Query parsing into report requests
//! - Error responses

pub mod error;
pub mod query;
pub mod routes;

use axum::Router;
use tally_core::reports::ReportOrchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Report entry point.
    pub reports: ReportOrchestrator,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
