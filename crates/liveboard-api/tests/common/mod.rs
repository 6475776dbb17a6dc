//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use liveboard_core::clock::Clock;
use liveboard_live::{ChannelConfig, LiveMode};
use liveboard_store::MemoryStore;
use liveboard_test_support::ManualClock;
use tower::ServiceExt;

use liveboard_api::app;
use liveboard_api::state::AppState;

/// Start of the test clock: 2026-01-15T10:00:00Z.
pub const START_MILLIS: i64 = 1_768_471_200_000;

/// A full app over one in-memory store, plus handles on its clock and store.
pub struct TestApp {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Returns a router sharing this app's state. Routers are consumed by
    /// `oneshot`, so take a fresh one per request.
    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Moves the app's clock forward.
    pub fn advance(&self, millis: i64) {
        self.clock.advance_millis(millis);
    }
}

/// Build the full app with polling live channels and default timing.
pub fn build_test_app() -> TestApp {
    build_test_app_with(LiveMode::Poll, ChannelConfig::default())
}

/// Build the full app with the given live channel design and timing.
pub fn build_test_app_with(live_mode: LiveMode, channel: ChannelConfig) -> TestApp {
    let clock = Arc::new(ManualClock::at_millis(START_MILLIS));
    let store = Arc::new(MemoryStore::new());
    let shared_clock: Arc<dyn Clock> = clock.clone();
    let state = AppState::new(store.clone(), shared_clock, live_mode, channel);

    TestApp {
        state,
        clock,
        store,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Splits an event-stream body into its JSON frames.
pub fn parse_frames(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let json = chunk
                .strip_prefix("data: ")
                .unwrap_or_else(|| panic!("frame without data prefix: {chunk:?}"));
            serde_json::from_str(json).unwrap()
        })
        .collect()
}
