//! Budget panel and dashboard routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tessera_shared::types::{ProjectId, WorkpackageId};

use crate::{AppState, error::finance_error_response};

/// Creates the panel routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workpackages/{id}/panel", get(get_workpackage_panel))
        .route("/projects/{id}/panel", get(get_project_panel))
        .route("/projects/{id}/dashboard", get(get_project_dashboard))
}

/// Query parameters for the project dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Reference date for deadline alerts; defaults to the current UTC date.
    pub today: Option<NaiveDate>,
}

/// GET /workpackages/{id}/panel
async fn get_workpackage_panel(
    State(state): State<AppState>,
    Path(id): Path<WorkpackageId>,
) -> impl IntoResponse {
    match state.finance.workpackage_panel(id).await {
        Ok(panel) => (StatusCode::OK, Json(panel)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// GET /projects/{id}/panel
async fn get_project_panel(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> impl IntoResponse {
    match state.finance.project_panel(id).await {
        Ok(panel) => (StatusCode::OK, Json(panel)).into_response(),
        Err(e) => finance_error_response(e),
    }
}

/// GET /projects/{id}/dashboard
async fn get_project_dashboard(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match state.finance.project_dashboard(id, today).await {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(e) => finance_error_response(e),
    }
}
