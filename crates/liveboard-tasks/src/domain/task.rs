//! Task state changes and the events they produce.

use liveboard_core::clock::Clock;
use liveboard_core::error::DomainError;
use liveboard_core::event::{EventKind, NewEvent, TaskCreated, TaskDeleted, TaskUpdated};
use liveboard_core::model::Task;
use liveboard_core::validation::{optional_text, required_text};
use uuid::Uuid;

use super::commands::CreateTask;

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Builds a new, open task for `command` and its `task_created` event.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title is blank or either field is
/// too long.
pub fn create(
    id: Uuid,
    command: &CreateTask,
    clock: &dyn Clock,
) -> Result<(Task, NewEvent), DomainError> {
    let title = required_text("title", &command.title, MAX_TITLE_CHARS)?;
    let description = optional_text(
        "description",
        command.description.as_deref(),
        MAX_DESCRIPTION_CHARS,
    )?;
    let now = clock.now_millis();

    let event = NewEvent::new(
        EventKind::TaskCreated(TaskCreated {
            task_id: id,
            title: title.clone(),
            description: description.clone(),
        }),
        now,
    );
    let task = Task {
        id,
        title,
        description,
        completed: false,
        created_at: now,
        updated_at: now,
    };

    Ok((task, event))
}

/// Returns `task` with its completion state flipped and `updated_at` set to
/// now, together with the `task_updated` event.
#[must_use]
pub fn toggle(task: &Task, clock: &dyn Clock) -> (Task, NewEvent) {
    let now = clock.now_millis();
    let updated = Task {
        completed: !task.completed,
        updated_at: now,
        ..task.clone()
    };
    let event = NewEvent::new(
        EventKind::TaskUpdated(TaskUpdated {
            task_id: task.id,
            completed: updated.completed,
        }),
        now,
    );
    (updated, event)
}

/// Builds the `task_deleted` event for removing `task_id`.
#[must_use]
pub fn removal(task_id: Uuid, clock: &dyn Clock) -> NewEvent {
    NewEvent::new(
        EventKind::TaskDeleted(TaskDeleted { task_id }),
        clock.now_millis(),
    )
}
