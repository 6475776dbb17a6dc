//! Entity records owned by the data store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: Uuid,
    /// Who wrote the message.
    pub author: String,
    /// The message text.
    pub body: String,
    /// Milliseconds since epoch when the message was sent.
    pub timestamp: i64,
}

/// A task on the shared list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Whether the task is done.
    pub completed: bool,
    /// Milliseconds since epoch when the task was created.
    pub created_at: i64,
    /// Milliseconds since epoch of the last change.
    pub updated_at: i64,
}
