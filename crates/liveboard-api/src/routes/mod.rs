//! Route modules organized by bounded context.

use serde::Serialize;
use uuid::Uuid;

pub mod events;
pub mod health;
pub mod messages;
pub mod tasks;

/// Response body returned after a create or delete succeeds.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// The affected entity.
    pub id: Uuid,
    /// ID of the event appended for the change.
    pub event_id: i64,
}
