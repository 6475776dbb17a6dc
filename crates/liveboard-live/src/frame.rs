//! Frames: the unit written down a live channel. The transport serializes
//! each frame as the JSON payload of one event-stream message.

use liveboard_core::event::StoredEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Frame type for the first frame of every channel.
pub const CONNECTED: &str = "connected";
/// Frame type for heartbeat frames.
pub const HEARTBEAT: &str = "heartbeat";
/// Frame type for in-stream error reports.
pub const ERROR: &str = "error";

/// Text carried by the `connected` frame.
pub const CONNECTED_MESSAGE: &str = "Connected to SSE endpoint";

/// One serialized unit pushed to a subscriber.
///
/// Event frames carry the event's `id`; control frames (`connected`,
/// `heartbeat`, `error`) omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Event identifier, for event frames only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Frame type: an event type tag or one of the control types.
    #[serde(rename = "type")]
    pub frame_type: String,
    /// Milliseconds since epoch.
    pub timestamp: i64,
    /// Type-specific payload.
    pub data: serde_json::Value,
}

impl Frame {
    /// The opening frame of a channel.
    #[must_use]
    pub fn connected(timestamp: i64, data: serde_json::Value) -> Self {
        Self::control(CONNECTED, timestamp, data)
    }

    /// A heartbeat carrying its sequence number in the message text.
    #[must_use]
    pub fn heartbeat(timestamp: i64, sequence: u32) -> Self {
        Self::control(
            HEARTBEAT,
            timestamp,
            json!({ "message": format!("Heartbeat #{sequence}") }),
        )
    }

    /// An in-stream error report. The channel keeps running after it.
    #[must_use]
    pub fn error(timestamp: i64, message: &str) -> Self {
        Self::control(ERROR, timestamp, json!({ "message": message }))
    }

    /// A frame forwarding one stored event.
    #[must_use]
    pub fn from_event(event: &StoredEvent) -> Self {
        Self {
            id: Some(event.id),
            frame_type: event.event_type.clone(),
            timestamp: event.timestamp,
            data: event.data.clone(),
        }
    }

    fn control(frame_type: &str, timestamp: i64, data: serde_json::Value) -> Self {
        Self {
            id: None,
            frame_type: frame_type.to_owned(),
            timestamp,
            data,
        }
    }
}
