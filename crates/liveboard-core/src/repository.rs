//! Data store abstractions.
//!
//! Every mutating method pairs the entity change with the event describing
//! it. Implementations must apply both as one unit: when the entity write
//! fails, the event is not appended. A store that cannot offer that must log
//! the gap when the event append fails after the entity write succeeded.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::{NewEvent, StoredEvent};
use crate::model::{Message, Task};

/// Read-only access to the event log.
///
/// Results are ordered newest first by `timestamp`, ties broken by insertion
/// order (newest first). When `since > 0` only events with
/// `timestamp > since` are returned. Never more than `limit` events.
#[async_trait]
pub trait EventQueryService: Send + Sync {
    /// Returns the most recent events after the cursor.
    async fn get_recent(&self, since: i64, limit: usize) -> Result<Vec<StoredEvent>, DomainError>;

    /// Same as [`get_recent`](Self::get_recent), restricted to one type tag.
    /// An unknown tag yields an empty result.
    async fn get_by_type(
        &self,
        event_type: &str,
        since: i64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, DomainError>;
}

/// Message persistence.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Inserts `message` and appends `event`.
    async fn insert_message(
        &self,
        message: &Message,
        event: NewEvent,
    ) -> Result<StoredEvent, DomainError>;

    /// Deletes the message and appends `event`.
    ///
    /// Returns `DomainError::NotFound` (and appends nothing) if the message
    /// does not exist.
    async fn delete_message(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError>;

    /// Lists up to `limit` messages, newest first.
    async fn list_messages(&self, limit: usize) -> Result<Vec<Message>, DomainError>;
}

/// Task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Loads one task.
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DomainError>;

    /// Inserts `task` and appends `event`.
    async fn insert_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError>;

    /// Replaces the full task record (last writer wins) and appends `event`.
    ///
    /// Returns `DomainError::NotFound` if the task no longer exists.
    async fn replace_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError>;

    /// Deletes the task and appends `event`.
    ///
    /// Returns `DomainError::NotFound` if the task does not exist.
    async fn delete_task(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError>;

    /// Lists tasks newest first by creation time, optionally filtered by
    /// completion state.
    async fn list_tasks(&self, completed: Option<bool>) -> Result<Vec<Task>, DomainError>;
}
