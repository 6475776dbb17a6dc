//! Application layer for the message context.

pub mod command_handlers;
pub mod query_handlers;
