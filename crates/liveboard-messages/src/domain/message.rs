//! Message construction and the events it produces.

use liveboard_core::clock::Clock;
use liveboard_core::error::DomainError;
use liveboard_core::event::{EventKind, MessageDeleted, MessageSent, NewEvent};
use liveboard_core::model::Message;
use liveboard_core::validation::required_text;
use uuid::Uuid;

use super::commands::SendMessage;

/// Longest accepted author name, in characters.
pub const MAX_AUTHOR_CHARS: usize = 64;

/// Longest accepted message body, in characters.
pub const MAX_BODY_CHARS: usize = 4000;

/// Builds the message record for `command` and the `message_sent` event
/// describing it. Both carry the same timestamp.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the author or body is blank or too
/// long.
pub fn compose(
    id: Uuid,
    command: &SendMessage,
    clock: &dyn Clock,
) -> Result<(Message, NewEvent), DomainError> {
    let author = required_text("author", &command.author, MAX_AUTHOR_CHARS)?;
    let body = required_text("body", &command.body, MAX_BODY_CHARS)?;
    let now = clock.now_millis();

    let event = NewEvent::new(
        EventKind::MessageSent(MessageSent {
            message_id: id,
            author: author.clone(),
            body: body.clone(),
        }),
        now,
    );
    let message = Message {
        id,
        author,
        body,
        timestamp: now,
    };

    Ok((message, event))
}

/// Builds the `message_deleted` event for removing `message_id`.
#[must_use]
pub fn removal(message_id: Uuid, clock: &dyn Clock) -> NewEvent {
    NewEvent::new(
        EventKind::MessageDeleted(MessageDeleted { message_id }),
        clock.now_millis(),
    )
}
