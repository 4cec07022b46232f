//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::reports::ReportError;
use tally_shared::AppError;
use tracing::{error, warn};

/// Converts a report failure into a JSON error response.
///
/// The body is `{error, kind, message}`; no partial figures are returned.
pub fn report_error_response(err: ReportError) -> Response {
    let kind = err.kind();
    let message = err.to_string();
    let app_error = AppError::from(err);
    let status = StatusCode::from_u16(app_error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(kind, error = %message, "Report failed");
    } else {
        warn!(kind, error = %message, "Report rejected");
    }

    (
        status,
        Json(json!({
            "error": app_error.error_code(),
            "kind": kind,
            "message": message,
        })),
    )
        .into_response()
}
