//! Domain layer for the task context.

pub mod commands;
pub mod task;
