//! Liveboard API: HTTP surface over the message and task contexts, the
//! event log, and the live update stream.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with configured origins once the
    // board has a deployed frontend.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::events::router())
        .merge(routes::messages::router())
        .merge(routes::tasks::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
