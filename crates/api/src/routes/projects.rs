//! Project lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tessera_shared::types::ProjectId;

use crate::{AppState, error::finance_error_response};

/// Creates the project lifecycle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects/{id}/approve", post(approve_project))
        .route("/projects/{id}/start", post(start_project))
        .route("/projects/{id}/complete", post(complete_project))
}

/// POST /projects/{id}/approve
///
/// Freezes the baseline of every workpackage lacking one.
async fn approve_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    match state.finance.approve_project(id).await {
        Ok(approval) => (StatusCode::OK, Json(approval)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// POST /projects/{id}/start
async fn start_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    match state.finance.start_project(id).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// POST /projects/{id}/complete
async fn complete_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    match state.finance.complete_project(id).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => finance_error_response(e),
    }
}
