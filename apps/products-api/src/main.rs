//! Products API - REST server over PostgreSQL

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        environment = ?config.environment,
        max_connections = config.database.max_connections,
        "Connecting to PostgreSQL"
    );

    let db = connect_from_config_with_retry(config.database.clone(), None).await?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name).await?;
    } else {
        info!("RUN_MIGRATIONS is off, skipping migrations");
    }

    let state = AppState {
        config: config.clone(),
        db,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(
        name = state.config.app.name,
        version = state.config.app.version,
        port = state.config.server.port,
        "Starting Products API"
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL pool");
            match db.close().await {
                Ok(()) => info!("PostgreSQL pool closed"),
                Err(e) => tracing::warn!(error = %e, "Failed to close PostgreSQL pool"),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
