//! Routes for reading the event log and subscribing to live updates.

use std::convert::Infallible;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use futures::StreamExt;
use liveboard_core::event::StoredEvent;
use liveboard_core::query::EventQuery;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the event list endpoints.
#[derive(Debug, Deserialize)]
pub struct EventListParams {
    /// Exclusive lower bound on event timestamps.
    pub since: Option<i64>,
    /// Maximum number of events to return.
    pub limit: Option<usize>,
}

/// Query parameters for GET /api/events.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Initial cursor. Kept as text so malformed values fall back to 0.
    pub since: Option<String>,
}

/// Response body for the event list endpoints.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    /// Events, newest first.
    pub events: Vec<StoredEvent>,
    /// Number of events returned.
    pub count: usize,
}

impl From<Vec<StoredEvent>> for EventListResponse {
    fn from(events: Vec<StoredEvent>) -> Self {
        Self {
            count: events.len(),
            events,
        }
    }
}

/// Parses the live stream cursor. Missing, negative or malformed values are 0.
fn parse_since(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|since| *since > 0)
        .unwrap_or(0)
}

/// GET /api/events
#[instrument(skip(state, params), fields(live_mode = ?state.live_mode))]
async fn stream_events(State(state): State<AppState>, Query(params): Query<StreamParams>) -> Response {
    let since = parse_since(params.since.as_deref());

    let (signal, frames) = liveboard_live::open_channel(
        state.live_mode,
        state.events.clone(),
        state.clock.clone(),
        state.channel_config,
        since,
    );

    let shutdown = state.shutdown_signal();
    let closed_by_shutdown = async move {
        shutdown.await;
        if signal.close() {
            info!("live channel closed for server shutdown");
        }
    };

    let events = frames
        .take_until(closed_by_shutdown)
        .filter_map(|frame| async move {
            match Event::default().json_data(&frame) {
                Ok(event) => Some(Ok::<_, Infallible>(event)),
                Err(err) => {
                    warn!(error = %err, frame_type = %frame.frame_type, "dropping unencodable frame");
                    None
                }
            }
        });

    (
        [
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Cache-Control"),
        ],
        Sse::new(events),
    )
        .into_response()
}

/// GET /api/events/recent
#[instrument(skip(state))]
async fn recent_events(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> Result<Json<EventListResponse>, ApiError> {
    let query = EventQuery::new(params.since, params.limit)?;

    let events = state.events.get_recent(query.since, query.limit).await?;

    Ok(Json(events.into()))
}

/// GET /api/events/types/{event_type}
#[instrument(skip(state))]
async fn events_by_type(
    State(state): State<AppState>,
    Path(event_type): Path<String>,
    Query(params): Query<EventListParams>,
) -> Result<Json<EventListResponse>, ApiError> {
    let query = EventQuery::new(params.since, params.limit)?;

    let events = state
        .events
        .get_by_type(&event_type, query.since, query.limit)
        .await?;

    Ok(Json(events.into()))
}

/// Returns the router for the event log.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(stream_events))
        .route("/api/events/recent", get(recent_events))
        .route("/api/events/types/{event_type}", get(events_by_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use liveboard_core::event::{EventKind, NewEvent, TaskCreated, TaskDeleted};
    use liveboard_core::model::Task;
    use liveboard_core::repository::{EventQueryService, MessageRepository, TaskRepository};
    use liveboard_live::{ChannelConfig, LiveMode};
    use liveboard_store::MemoryStore;
    use liveboard_test_support::{FailingStore, FixedClock};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app_state_with<S>(store: Arc<S>, live_mode: LiveMode, config: ChannelConfig) -> AppState
    where
        S: EventQueryService + MessageRepository + TaskRepository + 'static,
    {
        AppState::new(store, Arc::new(FixedClock::at_millis(5_000)), live_mode, config)
    }

    async fn seed(store: &MemoryStore, timestamps: &[i64]) {
        for &ts in timestamps {
            let task = Task {
                id: Uuid::new_v4(),
                title: format!("task {ts}"),
                description: None,
                completed: false,
                created_at: ts,
                updated_at: ts,
            };
            let event = NewEvent::new(
                EventKind::TaskCreated(TaskCreated {
                    task_id: task.id,
                    title: task.title.clone(),
                    description: None,
                }),
                ts,
            );
            store.insert_task(&task, event).await.unwrap();
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_parse_since_is_lenient() {
        assert_eq!(parse_since(None), 0);
        assert_eq!(parse_since(Some("1700")), 1_700);
        assert_eq!(parse_since(Some("-5")), 0);
        assert_eq!(parse_since(Some("yesterday")), 0);
    }

    #[tokio::test]
    async fn test_recent_events_returns_newest_first_with_count() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        seed(&store, &[100, 300, 200]).await;
        let app = router().with_state(app_state_with(
            store,
            LiveMode::Poll,
            ChannelConfig::default(),
        ));

        // Act
        let (status, json) = get_json(app, "/api/events/recent?since=100&limit=5").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["events"][0]["timestamp"], 300);
        assert_eq!(json["events"][1]["timestamp"], 200);
        assert_eq!(json["events"][0]["type"], "task_created");
    }

    #[tokio::test]
    async fn test_recent_events_rejects_zero_limit() {
        let app = router().with_state(app_state_with(
            Arc::new(MemoryStore::new()),
            LiveMode::Poll,
            ChannelConfig::default(),
        ));

        let (status, json) = get_json(app, "/api/events/recent?limit=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_events_by_unknown_type_is_empty() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &[100]).await;
        let app = router().with_state(app_state_with(
            store,
            LiveMode::Poll,
            ChannelConfig::default(),
        ));

        let (status, json) = get_json(app, "/api/events/types/no_such_type").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 0);
        assert_eq!(json["events"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_recent_events_maps_store_failure_to_500() {
        let app = router().with_state(app_state_with(
            Arc::new(FailingStore),
            LiveMode::Poll,
            ChannelConfig::default(),
        ));

        let (status, json) = get_json(app, "/api/events/recent").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_sets_event_stream_headers_and_first_frame() {
        // Arrange
        let app = router().with_state(app_state_with(
            Arc::new(MemoryStore::new()),
            LiveMode::Poll,
            ChannelConfig::default(),
        ));
        let request = Request::builder()
            .uri("/api/events?since=42")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let mut body = response.into_body();
        let first = body.frame().await.unwrap().unwrap().into_data().unwrap();
        let text = std::str::from_utf8(&first).unwrap();
        let json: Value = serde_json::from_str(text.strip_prefix("data: ").unwrap().trim_end()).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["data"]["since"], 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_outlives_the_router_that_served_it() {
        // Arrange
        let app = router().with_state(app_state_with(
            Arc::new(MemoryStore::new()),
            LiveMode::Heartbeat,
            ChannelConfig::default(),
        ));
        let request = Request::builder().uri("/api/events").body(Body::empty()).unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        // Assert
        let text = std::str::from_utf8(&bytes).unwrap();
        let frames: Vec<Value> = text
            .split("\n\n")
            .filter_map(|chunk| chunk.strip_prefix("data: "))
            .map(|json| serde_json::from_str(json).unwrap())
            .collect();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0]["type"], "connected");
        assert_eq!(frames[9]["data"]["message"], "Heartbeat #9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_ends_on_shutdown() {
        // Arrange
        let state = app_state_with(
            Arc::new(FailingStore),
            LiveMode::Poll,
            ChannelConfig {
                interval: Duration::from_secs(1),
                ..ChannelConfig::default()
            },
        );
        let app = router().with_state(state.clone());
        let request = Request::builder().uri("/api/events").body(Body::empty()).unwrap();
        let mut body = app.oneshot(request).await.unwrap().into_body();
        body.frame().await.unwrap().unwrap();

        // Act
        state.begin_shutdown();

        // Assert
        assert!(body.frame().await.is_none());
    }

    #[test]
    fn test_event_list_response_keeps_camel_case_payloads() {
        let event = StoredEvent::from_new(
            1,
            &NewEvent::new(
                EventKind::TaskDeleted(TaskDeleted {
                    task_id: Uuid::nil(),
                }),
                10,
            ),
        );

        let json = serde_json::to_value(EventListResponse::from(vec![event])).unwrap();

        assert_eq!(json["events"][0]["data"]["taskId"], Uuid::nil().to_string());
    }
}
