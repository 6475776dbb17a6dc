//! Shared test mocks and utilities for the liveboard service.

mod clock;
mod repository;

pub use clock::{FixedClock, ManualClock};
pub use repository::{FailingStore, FlakyEventLog};
