//! Monthly expense routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{AppState, error::finance_error_response};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses/monthly", get(get_monthly_expenses))
        .route("/expenses/overview", get(get_year_overview))
}

/// Query parameters for the monthly expense series.
#[derive(Debug, Deserialize)]
pub struct MonthlyExpensesQuery {
    /// Calendar year.
    pub year: i32,
    /// Number of months from January (1-12). Defaults to 12.
    pub limit: Option<u32>,
}

/// Query parameters for the annual overview.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Calendar year.
    pub year: i32,
}

/// GET /expenses/monthly?year=&limit=
async fn get_monthly_expenses(
    State(state): State<AppState>,
    Query(query): Query<MonthlyExpensesQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(12);
    match state.finance.monthly_expenses(query.year, limit).await {
        Ok(expenses) => (StatusCode::OK, Json(expenses)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// GET /expenses/overview?year=
async fn get_year_overview(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    match state.finance.year_overview(query.year).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => finance_error_response(e),
    }
}
