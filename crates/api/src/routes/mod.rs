//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod allocations;
pub mod configuration;
pub mod expenses;
pub mod health;
pub mod panels;
pub mod projects;
pub mod snapshots;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(panels::routes())
        .merge(projects::routes())
        .merge(expenses::routes())
        .merge(snapshots::routes())
        .merge(allocations::routes())
        .merge(configuration::routes())
}
