//! Event model: the append-only facts that feed the live channel.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag for [`MessageSent`].
pub const MESSAGE_SENT: &str = "message_sent";
/// Type tag for [`MessageDeleted`].
pub const MESSAGE_DELETED: &str = "message_deleted";
/// Type tag for [`TaskCreated`].
pub const TASK_CREATED: &str = "task_created";
/// Type tag for [`TaskUpdated`].
pub const TASK_UPDATED: &str = "task_updated";
/// Type tag for [`TaskDeleted`].
pub const TASK_DELETED: &str = "task_deleted";

/// Emitted when a message is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSent {
    /// The new message identifier.
    pub message_id: Uuid,
    /// Who wrote the message.
    pub author: String,
    /// The message text.
    pub body: String,
}

/// Emitted when a message is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeleted {
    /// The removed message identifier.
    pub message_id: Uuid,
}

/// Emitted when a task is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    /// The new task identifier.
    pub task_id: Uuid,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
}

/// Emitted when a task's completion state flips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdated {
    /// The updated task identifier.
    pub task_id: Uuid,
    /// Completion state after the update.
    pub completed: bool,
}

/// Emitted when a task is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeleted {
    /// The removed task identifier.
    pub task_id: Uuid,
}

/// Event payload variants, keyed by the event's type tag.
///
/// `Other` carries any type tag this build does not know about, or a known
/// tag whose payload no longer matches the current shape, so that the raw
/// payload is passed through rather than dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A message was posted.
    MessageSent(MessageSent),
    /// A message was removed.
    MessageDeleted(MessageDeleted),
    /// A task was created.
    TaskCreated(TaskCreated),
    /// A task's completion state changed.
    TaskUpdated(TaskUpdated),
    /// A task was removed.
    TaskDeleted(TaskDeleted),
    /// An event type outside the known set.
    Other {
        /// The raw type tag.
        event_type: String,
        /// The raw payload.
        data: serde_json::Value,
    },
}

impl EventKind {
    /// Returns the type tag stored alongside the payload.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::MessageSent(_) => MESSAGE_SENT,
            Self::MessageDeleted(_) => MESSAGE_DELETED,
            Self::TaskCreated(_) => TASK_CREATED,
            Self::TaskUpdated(_) => TASK_UPDATED,
            Self::TaskDeleted(_) => TASK_DELETED,
            Self::Other { event_type, .. } => event_type,
        }
    }

    /// Serializes the payload to JSON.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        let value = match self {
            Self::MessageSent(p) => serde_json::to_value(p),
            Self::MessageDeleted(p) => serde_json::to_value(p),
            Self::TaskCreated(p) => serde_json::to_value(p),
            Self::TaskUpdated(p) => serde_json::to_value(p),
            Self::TaskDeleted(p) => serde_json::to_value(p),
            Self::Other { data, .. } => return data.clone(),
        };
        value.expect("event payload serialization is infallible")
    }

    /// Rebuilds a kind from a stored type tag and payload.
    #[must_use]
    pub fn from_parts(event_type: &str, data: serde_json::Value) -> Self {
        fn decode<T: DeserializeOwned>(
            data: &serde_json::Value,
            wrap: fn(T) -> EventKind,
        ) -> Option<EventKind> {
            serde_json::from_value(data.clone()).ok().map(wrap)
        }

        let known = match event_type {
            MESSAGE_SENT => decode(&data, Self::MessageSent),
            MESSAGE_DELETED => decode(&data, Self::MessageDeleted),
            TASK_CREATED => decode(&data, Self::TaskCreated),
            TASK_UPDATED => decode(&data, Self::TaskUpdated),
            TASK_DELETED => decode(&data, Self::TaskDeleted),
            _ => None,
        };

        known.unwrap_or_else(|| Self::Other {
            event_type: event_type.to_owned(),
            data,
        })
    }
}

/// An event about to be appended. The store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Event payload.
    pub kind: EventKind,
    /// Milliseconds since epoch; equals the entity write's effective time.
    pub timestamp: i64,
}

impl NewEvent {
    /// Creates a new pending event.
    #[must_use]
    pub fn new(kind: EventKind, timestamp: i64) -> Self {
        Self { kind, timestamp }
    }
}

/// Stored representation of an event in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Store-assigned identifier, increasing with insertion order.
    pub id: i64,
    /// Type tag.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Type-specific payload.
    pub data: serde_json::Value,
    /// Milliseconds since epoch.
    pub timestamp: i64,
}

impl StoredEvent {
    /// Builds the stored form of `event` under the given identifier.
    #[must_use]
    pub fn from_new(id: i64, event: &NewEvent) -> Self {
        Self {
            id,
            event_type: event.kind.event_type().to_owned(),
            data: event.kind.to_payload(),
            timestamp: event.timestamp,
        }
    }

    /// Decodes the payload into its typed variant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        EventKind::from_parts(&self.event_type, self.data.clone())
    }
}
