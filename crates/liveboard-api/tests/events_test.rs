//! Integration tests for the event log read endpoints.

mod common;

use axum::http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_create_task_appears_in_recent_events() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, created) = common::post_json(
        app.router(),
        "/api/tasks",
        &serde_json::json!({ "title": "Buy milk" }),
    )
    .await;
    let (_, json) = common::get_json(app.router(), "/api/events/recent?since=0&limit=10").await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["count"], 1);
    let event = &json["events"][0];
    assert_eq!(event["type"], "task_created");
    assert_eq!(event["data"]["title"], "Buy milk");
    assert_eq!(event["id"], created["event_id"]);
    assert_eq!(event["timestamp"], common::START_MILLIS);
}

#[tokio::test]
async fn test_every_mutation_appends_exactly_one_event() {
    // Arrange
    let app = common::build_test_app();
    let (_, message) = common::post_json(
        app.router(),
        "/api/messages",
        &serde_json::json!({ "author": "ada", "body": "hi" }),
    )
    .await;
    app.advance(1);
    let (_, task) = common::post_json(
        app.router(),
        "/api/tasks",
        &serde_json::json!({ "title": "Buy milk", "description": "2 litres" }),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_owned();
    app.advance(1);
    common::post_empty(app.router(), &format!("/api/tasks/{task_id}/toggle")).await;
    app.advance(1);
    common::delete_json(app.router(), &format!("/api/tasks/{task_id}")).await;
    app.advance(1);
    let message_id = message["id"].as_str().unwrap().to_owned();
    common::delete_json(app.router(), &format!("/api/messages/{message_id}")).await;

    // Act
    let (_, json) = common::get_json(app.router(), "/api/events/recent").await;

    // Assert
    let types: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            "message_deleted",
            "task_deleted",
            "task_updated",
            "task_created",
            "message_sent",
        ]
    );
    assert_eq!(app.store.event_count().unwrap(), 5);
}

#[tokio::test]
async fn test_toggle_missing_task_returns_404_and_appends_nothing() {
    let app = common::build_test_app();

    let (status, json) =
        common::post_empty(app.router(), &format!("/api/tasks/{}/toggle", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(app.store.event_count().unwrap(), 0);
}

#[tokio::test]
async fn test_events_by_type_is_subset_of_recent() {
    // Arrange
    let app = common::build_test_app();
    for title in ["a", "b"] {
        common::post_json(
            app.router(),
            "/api/tasks",
            &serde_json::json!({ "title": title }),
        )
        .await;
        app.advance(5);
    }
    common::post_json(
        app.router(),
        "/api/messages",
        &serde_json::json!({ "author": "ada", "body": "hi" }),
    )
    .await;

    // Act
    let (_, recent) = common::get_json(app.router(), "/api/events/recent").await;
    let (status, by_type) =
        common::get_json(app.router(), "/api/events/types/task_created").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_type["count"], 2);
    let recent = recent["events"].as_array().unwrap();
    for event in by_type["events"].as_array().unwrap() {
        assert_eq!(event["type"], "task_created");
        assert!(recent.contains(event));
    }
}

#[tokio::test]
async fn test_recent_events_is_idempotent() {
    let app = common::build_test_app();
    common::post_json(
        app.router(),
        "/api/tasks",
        &serde_json::json!({ "title": "Buy milk" }),
    )
    .await;

    let (_, first) = common::get_json(app.router(), "/api/events/recent").await;
    let (_, second) = common::get_json(app.router(), "/api/events/recent").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_recent_events_rejects_negative_since() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app.router(), "/api/events/recent?since=-1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
