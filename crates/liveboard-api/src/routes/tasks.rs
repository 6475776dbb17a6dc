//! Routes for the task context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use liveboard_core::model::Task;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use liveboard_tasks::application::{command_handlers, query_handlers};
use liveboard_tasks::domain::commands;

use crate::error::ApiError;
use crate::routes::MutationResponse;
use crate::state::AppState;

/// Request body for POST /api/tasks.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for GET /api/tasks.
#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    /// Only return tasks with this completion state.
    pub completed: Option<bool>,
}

/// Response body for GET /api/tasks.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// Tasks, newest first.
    pub tasks: Vec<Task>,
    /// Number of tasks returned.
    pub count: usize,
}

/// POST /api/tasks
#[instrument(skip(state, request))]
async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let command = commands::CreateTask {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling create_task command");

    let change =
        command_handlers::handle_create_task(&command, state.clock.as_ref(), &*state.tasks).await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id: change.task.id,
            event_id: change.event.id,
        }),
    ))
}

/// GET /api/tasks
#[instrument(skip(state))]
async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListTasksParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = query_handlers::list_tasks(params.completed, &*state.tasks).await?;

    Ok(Json(TaskListResponse {
        count: tasks.len(),
        tasks,
    }))
}

/// GET /api/tasks/{id}
#[instrument(skip(state))]
async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = query_handlers::get_task_by_id(task_id, &*state.tasks).await?;
    Ok(Json(task))
}

/// POST /api/tasks/{id}/toggle
#[instrument(skip(state))]
async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let command = commands::ToggleTask {
        correlation_id: Uuid::new_v4(),
        task_id,
    };

    info!(correlation_id = %command.correlation_id, "handling toggle_task command");

    let change =
        command_handlers::handle_toggle_task(&command, state.clock.as_ref(), &*state.tasks).await?;

    Ok(Json(change.task))
}

/// DELETE /api/tasks/{id}
#[instrument(skip(state))]
async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<MutationResponse>, ApiError> {
    let command = commands::DeleteTask {
        correlation_id: Uuid::new_v4(),
        task_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_task command");

    let stored =
        command_handlers::handle_delete_task(&command, state.clock.as_ref(), &*state.tasks).await?;

    Ok(Json(MutationResponse {
        id: task_id,
        event_id: stored.id,
    }))
}

/// Returns the router for the task context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", get(get_task).delete(delete_task))
        .route("/api/tasks/{id}/toggle", post(toggle_task))
}
