//! Domain layer for the message context.

pub mod commands;
pub mod message;
