//! Allocation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use tessera_core::allocation::AllocationInput;
use tessera_shared::types::UserId;

use crate::{AppState, error::finance_error_response};

/// Creates the allocation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/allocations", put(upsert_allocation))
        .route("/users/{id}/occupancy", get(get_user_occupancy))
}

/// Query parameters for a user's occupancy.
#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    /// Calendar year.
    pub year: i32,
}

/// PUT /allocations
///
/// Over-allocation is reported in the response, never rejected.
async fn upsert_allocation(
    State(state): State<AppState>,
    Json(payload): Json<AllocationInput>,
) -> impl IntoResponse {
    match state.finance.upsert_allocation(payload).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// GET /users/{id}/occupancy?year=
async fn get_user_occupancy(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Query(query): Query<OccupancyQuery>,
) -> impl IntoResponse {
    match state.finance.user_occupancy(id, query.year).await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => finance_error_response(e),
    }
}
