//! Query handlers for the message context.

use liveboard_core::error::DomainError;
use liveboard_core::model::Message;
use liveboard_core::repository::MessageRepository;

/// Number of messages returned when the caller gives no limit.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Largest page a caller may ask for.
pub const MAX_LIST_LIMIT: usize = 200;

/// Lists recent messages, newest first.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `limit` is zero, or the repository
/// error if the read fails.
pub async fn list_messages(
    limit: Option<usize>,
    repo: &dyn MessageRepository,
) -> Result<Vec<Message>, DomainError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit == 0 {
        return Err(DomainError::Validation("limit must be >= 1".to_owned()));
    }
    repo.list_messages(limit.min(MAX_LIST_LIMIT)).await
}
