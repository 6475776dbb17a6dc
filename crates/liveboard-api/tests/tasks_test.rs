//! Integration tests for the task context.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_task_lifecycle_round_trip() {
    // Arrange
    let app = common::build_test_app();

    // Act: create
    let (status, created) = common::post_json(
        app.router(),
        "/api/tasks",
        &serde_json::json!({ "title": "  Buy milk ", "description": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = created["id"].as_str().unwrap().to_owned();

    // Act: toggle
    app.advance(1_000);
    let (status, toggled) =
        common::post_empty(app.router(), &format!("/api/tasks/{task_id}/toggle")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["title"], "Buy milk");
    assert!(toggled["description"].is_null());
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["createdAt"], common::START_MILLIS);
    assert_eq!(toggled["updatedAt"], common::START_MILLIS + 1_000);

    let (status, fetched) = common::get_json(app.router(), &format!("/api/tasks/{task_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, toggled);

    // Act: delete
    let (status, deleted) = common::delete_json(app.router(), &format!("/api/tasks/{task_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], task_id);

    let (status, json) = common::get_json(app.router(), "/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_list_tasks_newest_first_and_filtered() {
    // Arrange
    let app = common::build_test_app();
    let mut ids = Vec::new();
    for title in ["older", "newer"] {
        let (_, created) = common::post_json(
            app.router(),
            "/api/tasks",
            &serde_json::json!({ "title": title }),
        )
        .await;
        ids.push(created["id"].as_str().unwrap().to_owned());
        app.advance(10);
    }
    common::post_empty(app.router(), &format!("/api/tasks/{}/toggle", ids[0])).await;

    // Act
    let (_, all) = common::get_json(app.router(), "/api/tasks").await;
    let (_, open) = common::get_json(app.router(), "/api/tasks?completed=false").await;

    // Assert
    assert_eq!(all["count"], 2);
    assert_eq!(all["tasks"][0]["title"], "newer");
    assert_eq!(all["tasks"][1]["title"], "older");
    assert_eq!(open["count"], 1);
    assert_eq!(open["tasks"][0]["id"], ids[1]);
}

#[tokio::test]
async fn test_get_task_with_malformed_id_returns_400() {
    let app = common::build_test_app();

    let (status, _) = common::get_json(app.router(), "/api/tasks/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
