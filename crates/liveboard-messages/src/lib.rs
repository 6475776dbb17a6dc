//! Liveboard — chat message bounded context.
//!
//! Responsible for posting and removing messages. Every change appends the
//! matching event to the event log.

pub mod application;
pub mod domain;
