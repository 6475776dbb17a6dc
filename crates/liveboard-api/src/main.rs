//! Liveboard API server entry point.

use std::sync::Arc;

use liveboard_api::config::Config;
use liveboard_api::error::AppError;
use liveboard_api::state::AppState;
use liveboard_api::{app, telemetry};
use liveboard_core::clock::{Clock, SystemClock};
use liveboard_store::{MemoryStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting liveboard API server");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app_state = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            let store = PgStore::new(pool);
            store.migrate().await.map_err(sqlx::Error::from)?;
            info!("database migrations applied");
            AppState::new(Arc::new(store), clock, config.live_mode, config.channel)
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store, data will not persist");
            AppState::new(
                Arc::new(MemoryStore::new()),
                clock,
                config.live_mode,
                config.channel,
            )
        }
    };

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, live_mode = config.live_mode.as_str(), "Listening");

    axum::serve(listener, app(app_state.clone()))
        .with_graceful_shutdown(shutdown_signal(app_state))
        .await?;

    info!("server stopped");
    telemetry.shutdown();

    Ok(())
}

/// Waits for Ctrl-C, then ends open live streams so the server can drain.
async fn shutdown_signal(state: AppState) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
    state.begin_shutdown();
}
