//! Command handlers for the task context.
//!
//! Each handler builds the entity change and its event, then hands both to
//! the repository as one unit.

use liveboard_core::clock::Clock;
use liveboard_core::error::DomainError;
use liveboard_core::event::StoredEvent;
use liveboard_core::model::Task;
use liveboard_core::repository::TaskRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{CreateTask, DeleteTask, ToggleTask};
use crate::domain::task;

/// A task as written, with the event appended alongside it.
#[derive(Debug, Clone)]
pub struct TaskChange {
    /// The task record after the change.
    pub task: Task,
    /// The event describing the change.
    pub event: StoredEvent,
}

/// Handles the `CreateTask` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for bad input, or the repository error if
/// the write fails (in which case no event is appended).
pub async fn handle_create_task(
    command: &CreateTask,
    clock: &dyn Clock,
    repo: &dyn TaskRepository,
) -> Result<TaskChange, DomainError> {
    let (task, event) = task::create(Uuid::now_v7(), command, clock)?;

    let stored = repo.insert_task(&task, event).await?;

    info!(
        correlation_id = %command.correlation_id,
        task_id = %task.id,
        event_id = stored.id,
        "task created"
    );

    Ok(TaskChange {
        task,
        event: stored,
    })
}

/// Handles the `ToggleTask` command: loads the task, flips `completed`, and
/// replaces the whole record. Concurrent toggles are last-writer-wins.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the task does not exist (no event is
/// appended), or the repository error if the read or write fails.
pub async fn handle_toggle_task(
    command: &ToggleTask,
    clock: &dyn Clock,
    repo: &dyn TaskRepository,
) -> Result<TaskChange, DomainError> {
    let current = repo
        .get_task(command.task_id)
        .await?
        .ok_or_else(|| DomainError::task_not_found(command.task_id))?;

    let (updated, event) = task::toggle(&current, clock);

    let stored = repo.replace_task(&updated, event).await?;

    info!(
        correlation_id = %command.correlation_id,
        task_id = %updated.id,
        completed = updated.completed,
        event_id = stored.id,
        "task toggled"
    );

    Ok(TaskChange {
        task: updated,
        event: stored,
    })
}

/// Handles the `DeleteTask` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the task does not exist, or the
/// repository error if the write fails.
pub async fn handle_delete_task(
    command: &DeleteTask,
    clock: &dyn Clock,
    repo: &dyn TaskRepository,
) -> Result<StoredEvent, DomainError> {
    let event = task::removal(command.task_id, clock);

    let stored = repo.delete_task(command.task_id, event).await?;

    info!(
        correlation_id = %command.correlation_id,
        task_id = %command.task_id,
        event_id = stored.id,
        "task deleted"
    );

    Ok(stored)
}
