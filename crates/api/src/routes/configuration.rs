//! Monthly configuration and funding program routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tessera_shared::types::FundingProgramId;

use crate::{AppState, error::finance_error_response};

/// Creates the configuration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/monthly-configurations/{year}/{month}",
            put(upsert_monthly_configuration),
        )
        .route("/funding-programs/{id}", delete(delete_funding_program))
}

/// Request body for a monthly configuration.
#[derive(Debug, Deserialize)]
pub struct MonthlyConfigurationRequest {
    /// Working days in the month (1-31).
    pub working_days: u32,
    /// Potential working hours (> 0).
    pub potential_hours: Decimal,
}

/// PUT /monthly-configurations/{year}/{month}
async fn upsert_monthly_configuration(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(payload): Json<MonthlyConfigurationRequest>,
) -> impl IntoResponse {
    match state
        .finance
        .upsert_monthly_configuration(month, year, payload.working_days, payload.potential_hours)
        .await
    {
        Ok(config) => (StatusCode::OK, Json(config)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// DELETE /funding-programs/{id}
///
/// Returns 409 while a project still references the program.
async fn delete_funding_program(
    State(state): State<AppState>,
    Path(id): Path<FundingProgramId>,
) -> impl IntoResponse {
    match state.finance.delete_funding_program(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => finance_error_response(e),
    }
}
