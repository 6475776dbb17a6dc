//! Liveboard — shared task list bounded context.
//!
//! Responsible for creating, completing, and removing tasks. Every change
//! appends the matching event to the event log.

pub mod application;
pub mod domain;
