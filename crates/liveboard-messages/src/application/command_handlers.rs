//! Command handlers for the message context.
//!
//! Each handler builds the entity change and its event, then hands both to
//! the repository as one unit.

use liveboard_core::clock::Clock;
use liveboard_core::error::DomainError;
use liveboard_core::event::StoredEvent;
use liveboard_core::model::Message;
use liveboard_core::repository::MessageRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{DeleteMessage, SendMessage};
use crate::domain::message;

/// Result of posting a message.
#[derive(Debug, Clone)]
pub struct MessagePosted {
    /// The stored message.
    pub message: Message,
    /// The `message_sent` event appended alongside it.
    pub event: StoredEvent,
}

/// Handles the `SendMessage` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for bad input, or the repository error if
/// the write fails (in which case no event is appended).
pub async fn handle_send_message(
    command: &SendMessage,
    clock: &dyn Clock,
    repo: &dyn MessageRepository,
) -> Result<MessagePosted, DomainError> {
    let (message, event) = message::compose(Uuid::now_v7(), command, clock)?;

    let stored = repo.insert_message(&message, event).await?;

    info!(
        correlation_id = %command.correlation_id,
        message_id = %message.id,
        event_id = stored.id,
        "message sent"
    );

    Ok(MessagePosted {
        message,
        event: stored,
    })
}

/// Handles the `DeleteMessage` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the message does not exist, or the
/// repository error if the write fails.
pub async fn handle_delete_message(
    command: &DeleteMessage,
    clock: &dyn Clock,
    repo: &dyn MessageRepository,
) -> Result<StoredEvent, DomainError> {
    let event = message::removal(command.message_id, clock);

    let stored = repo.delete_message(command.message_id, event).await?;

    info!(
        correlation_id = %command.correlation_id,
        message_id = %command.message_id,
        event_id = stored.id,
        "message deleted"
    );

    Ok(stored)
}
