//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes over the finance service
//! - JSON error responses mapped from the finance error taxonomy
//!
//! Authorization is handled upstream; handlers trust their caller.

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tessera_core::FinanceService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Financial engine.
    pub finance: Arc<FinanceService>,
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
