//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tessera_core::FinanceError;
use tessera_shared::AppError;
use tracing::error;

/// Converts an application error into a `{"error", "message"}` JSON response.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, retryable = err.is_retryable(), "Request failed");
        let message = if err.is_retryable() {
            "The data store is temporarily unavailable, please retry"
        } else {
            "An error occurred"
        };
        return (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": message
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

/// Converts a finance error into a JSON response.
pub fn finance_error_response(err: FinanceError) -> Response {
    error_response(&AppError::from(err))
}
