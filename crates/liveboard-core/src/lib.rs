//! Liveboard Core — shared domain abstractions.
//!
//! This crate defines the event model, entity records, and store traits that
//! the bounded contexts, the live channel, and the HTTP layer depend on. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod model;
pub mod query;
pub mod repository;
pub mod validation;
