//! Query handlers for the task context.

use liveboard_core::error::DomainError;
use liveboard_core::model::Task;
use liveboard_core::repository::TaskRepository;
use uuid::Uuid;

/// Lists tasks newest first, optionally only those with the given completion
/// state.
///
/// # Errors
///
/// Returns the repository error if the read fails.
pub async fn list_tasks(
    completed: Option<bool>,
    repo: &dyn TaskRepository,
) -> Result<Vec<Task>, DomainError> {
    repo.list_tasks(completed).await
}

/// Retrieves a single task.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no task has the ID.
pub async fn get_task_by_id(task_id: Uuid, repo: &dyn TaskRepository) -> Result<Task, DomainError> {
    repo.get_task(task_id)
        .await?
        .ok_or_else(|| DomainError::task_not_found(task_id))
}

#[cfg(test)]
mod tests {
    use liveboard_core::error::DomainError;
    use liveboard_store::MemoryStore;
    use liveboard_test_support::ManualClock;
    use uuid::Uuid;

    use crate::application::command_handlers::{handle_create_task, handle_toggle_task};
    use crate::application::query_handlers::{get_task_by_id, list_tasks};
    use crate::domain::commands::{CreateTask, ToggleTask};

    #[tokio::test]
    async fn test_list_tasks_filters_and_orders_newest_first() {
        // Arrange
        let store = MemoryStore::new();
        let clock = ManualClock::at_millis(1_000);
        let mut ids = Vec::new();
        for title in ["one", "two", "three"] {
            let command = CreateTask {
                correlation_id: Uuid::new_v4(),
                title: title.to_owned(),
                description: None,
            };
            ids.push(handle_create_task(&command, &clock, &store).await.unwrap().task.id);
            clock.advance_millis(10);
        }
        let toggle = ToggleTask {
            correlation_id: Uuid::new_v4(),
            task_id: ids[1],
        };
        handle_toggle_task(&toggle, &clock, &store).await.unwrap();

        // Act
        let all = list_tasks(None, &store).await.unwrap();
        let open = list_tasks(Some(false), &store).await.unwrap();
        let done = list_tasks(Some(true), &store).await.unwrap();

        // Assert
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two", "one"]);
        let open_titles: Vec<&str> = open.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(open_titles, vec!["three", "one"]);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, ids[1]);
    }

    #[tokio::test]
    async fn test_get_task_by_id_returns_not_found_for_missing_task() {
        let task_id = Uuid::new_v4();

        let result = get_task_by_id(task_id, &MemoryStore::new()).await;

        match result {
            Err(DomainError::NotFound { id, .. }) => assert_eq!(id, task_id),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
