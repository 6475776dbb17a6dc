//! `PostgreSQL` implementation of the store traits.

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use liveboard_core::error::DomainError;
use liveboard_core::event::{NewEvent, StoredEvent};
use liveboard_core::model::{Message, Task};
use liveboard_core::repository::{EventQueryService, MessageRepository, TaskRepository};

/// PostgreSQL-backed data store.
///
/// Each mutation runs the entity statement and the event insert inside one
/// transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the migrations shipped in the workspace `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns the migrator error if any migration fails to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    event_type: String,
    data: serde_json::Value,
    timestamp_ms: i64,
}

impl From<EventRow> for StoredEvent {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            event_type: row.event_type,
            data: row.data,
            timestamp: row.timestamp_ms,
        }
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    author: String,
    body: String,
    timestamp_ms: i64,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            author: row.author,
            body: row.body,
            timestamp: row.timestamp_ms,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn infrastructure(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "postgres store operation failed");
    DomainError::Infrastructure(err.to_string())
}

fn bind_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

async fn append_event(conn: &mut PgConnection, event: &NewEvent) -> Result<StoredEvent, DomainError> {
    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO events (event_type, data, timestamp_ms)
        VALUES ($1, $2, $3)
        RETURNING id
        ",
    )
    .bind(event.kind.event_type())
    .bind(event.kind.to_payload())
    .bind(event.timestamp)
    .fetch_one(&mut *conn)
    .await
    .map_err(infrastructure)?;

    Ok(StoredEvent::from_new(id, event))
}

#[async_trait]
impl EventQueryService for PgStore {
    async fn get_recent(&self, since: i64, limit: usize) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT id, event_type, data, timestamp_ms
            FROM events
            WHERE $1 <= 0 OR timestamp_ms > $1
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(since)
        .bind(bind_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }

    async fn get_by_type(
        &self,
        event_type: &str,
        since: i64,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT id, event_type, data, timestamp_ms
            FROM events
            WHERE event_type = $1 AND ($2 <= 0 OR timestamp_ms > $2)
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT $3
            ",
        )
        .bind(event_type)
        .bind(since)
        .bind(bind_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn insert_message(
        &self,
        message: &Message,
        event: NewEvent,
    ) -> Result<StoredEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query("INSERT INTO messages (id, author, body, timestamp_ms) VALUES ($1, $2, $3, $4)")
            .bind(message.id)
            .bind(&message.author)
            .bind(&message.body)
            .bind(message.timestamp)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?;

        let stored = append_event(&mut tx, &event).await?;
        tx.commit().await.map_err(infrastructure)?;
        Ok(stored)
    }

    async fn delete_message(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let deleted = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?
            .rows_affected();
        if deleted == 0 {
            return Err(DomainError::message_not_found(id));
        }

        let stored = append_event(&mut tx, &event).await?;
        tx.commit().await.map_err(infrastructure)?;
        Ok(stored)
    }

    async fn list_messages(&self, limit: usize) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, author, body, timestamp_ms
            FROM messages
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(bind_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(row.map(Task::from))
    }

    async fn insert_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            r"
            INSERT INTO tasks (id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;

        let stored = append_event(&mut tx, &event).await?;
        tx.commit().await.map_err(infrastructure)?;
        Ok(stored)
    }

    async fn replace_task(&self, task: &Task, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let updated = sqlx::query(
            r"
            UPDATE tasks
            SET title = $2, description = $3, completed = $4, created_at = $5, updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?
        .rows_affected();
        if updated == 0 {
            return Err(DomainError::task_not_found(task.id));
        }

        let stored = append_event(&mut tx, &event).await?;
        tx.commit().await.map_err(infrastructure)?;
        Ok(stored)
    }

    async fn delete_task(&self, id: Uuid, event: NewEvent) -> Result<StoredEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let deleted = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?
            .rows_affected();
        if deleted == 0 {
            return Err(DomainError::task_not_found(id));
        }

        let stored = append_event(&mut tx, &event).await?;
        tx.commit().await.map_err(infrastructure)?;
        Ok(stored)
    }

    async fn list_tasks(&self, completed: Option<bool>) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE $1::BOOLEAN IS NULL OR completed = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(completed)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(Task::from).collect())
    }
}
