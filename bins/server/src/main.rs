//! Tessera API Server
//!
//! Main entry point for the Tessera financial engine.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tessera_api::{AppState, create_router};
use tessera_core::store::{InMemoryStore, Stores};
use tessera_core::{FinanceService, FinanceSettings};
use tessera_db::{PgStore, connect_with};
use tessera_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Pick the store backend
    let stores = if config.database.url.is_some() {
        let db = connect_with(&config.database).await?;
        info!("Connected to database");
        Stores::from_backend(Arc::new(PgStore::new(db)))
    } else {
        warn!("No database.url configured, using the in-memory store");
        Stores::from_backend(Arc::new(InMemoryStore::new()))
    };

    let settings = FinanceSettings::from(&config.finance);
    info!(
        default_working_days = settings.monthly_defaults.working_days,
        default_potential_hours = %settings.monthly_defaults.potential_hours,
        deadline_alert_days = settings.deadline_alert_days,
        "Finance service configured"
    );

    // Create application state
    let state = AppState {
        finance: Arc::new(FinanceService::new(stores, settings)),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
