//! Commands for the message context.

use uuid::Uuid;

/// Command to post a new message.
#[derive(Debug, Clone)]
pub struct SendMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Who is posting.
    pub author: String,
    /// The message text.
    pub body: String,
}

/// Command to remove a message.
#[derive(Debug, Clone)]
pub struct DeleteMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The message to remove.
    pub message_id: Uuid,
}
