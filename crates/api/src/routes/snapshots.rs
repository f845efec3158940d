//! Budget snapshot routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tessera_shared::types::WorkpackageId;

use crate::{AppState, error::finance_error_response};

/// Creates the snapshot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workpackages/{id}/snapshot", post(take_snapshot))
        .route("/workpackages/{id}/resnapshot", post(resnapshot))
        .route("/workpackages/{id}/snapshots", get(list_snapshots))
}

/// POST /workpackages/{id}/snapshot
///
/// Returns 409 when the workpackage already has a snapshot.
async fn take_snapshot(
    State(state): State<AppState>,
    Path(id): Path<WorkpackageId>,
) -> impl IntoResponse {
    match state.finance.take_snapshot(id).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// POST /workpackages/{id}/resnapshot
async fn resnapshot(
    State(state): State<AppState>,
    Path(id): Path<WorkpackageId>,
) -> impl IntoResponse {
    match state.finance.resnapshot(id).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// GET /workpackages/{id}/snapshots
async fn list_snapshots(
    State(state): State<AppState>,
    Path(id): Path<WorkpackageId>,
) -> impl IntoResponse {
    match state.finance.snapshot_history(id).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => finance_error_response(e),
    }
}
