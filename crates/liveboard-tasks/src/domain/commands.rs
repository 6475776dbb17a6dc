//! Commands for the task context.

use uuid::Uuid;

/// Command to add a task to the list.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
}

/// Command to flip a task's completion state.
#[derive(Debug, Clone)]
pub struct ToggleTask {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The task to toggle.
    pub task_id: Uuid,
}

/// Command to remove a task.
#[derive(Debug, Clone)]
pub struct DeleteTask {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The task to remove.
    pub task_id: Uuid,
}
