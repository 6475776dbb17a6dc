//! Test stores — mock store trait implementations for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use liveboard_core::error::DomainError;
use liveboard_core::event::{NewEvent, StoredEvent};
use liveboard_core::model::{Message, Task};
use liveboard_core::repository::{EventQueryService, MessageRepository, TaskRepository};
use uuid::Uuid;

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

/// A store whose every operation returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl EventQueryService for FailingStore {
    async fn get_recent(&self, _since: i64, _limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        Err(refused())
    }

    async fn get_by_type(
        &self,
        _event_type: &str,
        _since: i64,
        _limit: usize,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(refused())
    }
}

#[async_trait]
impl MessageRepository for FailingStore {
    async fn insert_message(
        &self,
        _message: &Message,
        _event: NewEvent,
    ) -> Result<StoredEvent, DomainError> {
        Err(refused())
    }

    async fn delete_message(&self, _id: Uuid, _event: NewEvent) -> Result<StoredEvent, DomainError> {
        Err(refused())
    }

    async fn list_messages(&self, _limit: usize) -> Result<Vec<Message>, DomainError> {
        Err(refused())
    }
}

#[async_trait]
impl TaskRepository for FailingStore {
    async fn get_task(&self, _id: Uuid) -> Result<Option<Task>, DomainError> {
        Err(refused())
    }

    async fn insert_task(&self, _task: &Task, _event: NewEvent) -> Result<StoredEvent, DomainError> {
        Err(refused())
    }

    async fn replace_task(&self, _task: &Task, _event: NewEvent) -> Result<StoredEvent, DomainError> {
        Err(refused())
    }

    async fn delete_task(&self, _id: Uuid, _event: NewEvent) -> Result<StoredEvent, DomainError> {
        Err(refused())
    }

    async fn list_tasks(&self, _completed: Option<bool>) -> Result<Vec<Task>, DomainError> {
        Err(refused())
    }
}

/// An event log that fails a fixed number of reads before delegating to an
/// inner log. Records how many reads were attempted.
#[derive(Debug)]
pub struct FlakyEventLog<Q> {
    inner: Q,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl<Q> FlakyEventLog<Q> {
    /// Wraps `inner`, failing the first `failures` reads.
    #[must_use]
    pub fn new(inner: Q, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of reads attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn should_fail(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<Q: EventQueryService> EventQueryService for FlakyEventLog<Q> {
    async fn get_recent(&self, since: i64, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        if self.should_fail() {
            return Err(refused());
        }
        self.inner.get_recent(since, limit).await
    }

    async fn get_by_type(
        &self,
        event_type: &str,
        since: i64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        if self.should_fail() {
            return Err(refused());
        }
        self.inner.get_by_type(event_type, since, limit).await
    }
}
