//! In-process implementation of the store traits.
//!
//! Used for local development without a database and as the backing store in
//! handler and route tests. All tables sit behind one lock, so an entity
//! change and its event are always applied together.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use liveboard_core::error::DomainError;
use liveboard_core::event::{NewEvent, StoredEvent};
use liveboard_core::model::{Message, Task};
use liveboard_core::query::EventQuery;
use liveboard_core::repository::{EventQueryService, MessageRepository, TaskRepository};

#[derive(Debug, Default)]
struct Tables {
    messages: HashMap<Uuid, Message>,
    tasks: HashMap<Uuid, Task>,
    /// Kept in insertion order; `id` is the position plus one.
    events: Vec<StoredEvent>,
}

impl Tables {
    fn append(&mut self, event: &NewEvent) -> StoredEvent {
        let id = i64::try_from(self.events.len()).unwrap_or(i64::MAX - 1) + 1;
        let stored = StoredEvent::from_new(id, event);
        self.events.push(stored.clone());
        stored
    }

    fn recent<'a>(
        &'a self,
        since: i64,
        limit: usize,
        filter: impl Fn(&StoredEvent) -> bool,
    ) -> Vec<StoredEvent> {
        let cursor = EventQuery { since, limit };
        // Newest insertion first, then a stable sort keeps that order among
        // equal timestamps.
        let mut matching: Vec<&'a StoredEvent> = self
            .events
            .iter()
            .rev()
            .filter(|e| cursor.admits(e.timestamp) && filter(e))
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.into_iter().take(limit).cloned().collect()
    }
}

/// A data store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|_| DomainError::Infrastructure("memory store lock poisoned".to_owned()))
    }

    /// Returns the number of events in the log.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn event_count(&self) -> Result<usize, DomainError> {
        Ok(self.tables()?.events.len())
    }
}

#[async_trait]
impl EventQueryService for MemoryStore {
    async fn get_recent(&self, since: i64, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.tables()?.recent(since, limit, |_| true))
    }

    async fn get_by_type(
        &self,
        event_type: &str,
        since: i64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self
            .tables()?
            .recent(since, limit, |e| e.event_type == event_type))
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn insert_message(
        &self,
        message: &Message,
        event: NewEvent,
    ) -> Result<StoredEvent, DomainError> {
        let mut tables = self.tables()?;
        tables.messages.insert(message.id, message.clone());
        Ok(tables.append(&event))
    }

    async fn delete_message(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tables = self.tables()?;
        if tables.messages.remove(&id).is_none() {
            return Err(DomainError::message_not_found(id));
        }
        Ok(tables.append(&event))
    }

    async fn list_messages(&self, limit: usize) -> Result<Vec<Message>, DomainError> {
        let tables = self.tables()?;
        let mut messages: Vec<Message> = tables.messages.values().cloned().collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        messages.truncate(limit);
        Ok(messages)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        Ok(self.tables()?.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tables = self.tables()?;
        tables.tasks.insert(task.id, task.clone());
        Ok(tables.append(&event))
    }

    async fn replace_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tables = self.tables()?;
        match tables.tasks.get_mut(&task.id) {
            Some(existing) => *existing = task.clone(),
            None => return Err(DomainError::task_not_found(task.id)),
        }
        Ok(tables.append(&event))
    }

    async fn delete_task(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tables = self.tables()?;
        if tables.tasks.remove(&id).is_none() {
            return Err(DomainError::task_not_found(id));
        }
        Ok(tables.append(&event))
    }

    async fn list_tasks(&self, completed: Option<bool>) -> Result<Vec<Task>, DomainError> {
        let tables = self.tables()?;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| completed.is_none_or(|c| t.completed == c))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }
}
