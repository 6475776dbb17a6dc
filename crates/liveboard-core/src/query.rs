//! Validated parameters for event log reads.

use crate::error::DomainError;

/// Default number of events returned by a read.
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the number of events a single read may return.
pub const MAX_LIMIT: usize = 100;

/// A cursor plus page size for reading the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    /// Exclusive lower bound on event timestamps; `0` means unbounded.
    pub since: i64,
    /// Maximum number of events to return.
    pub limit: usize,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            since: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl EventQuery {
    /// Builds a query from optional caller-supplied values, applying defaults.
    ///
    /// `limit` values above [`MAX_LIMIT`] are clamped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `since` is negative or `limit` is
    /// zero.
    pub fn new(since: Option<i64>, limit: Option<usize>) -> Result<Self, DomainError> {
        let since = since.unwrap_or(0);
        if since < 0 {
            return Err(DomainError::Validation(format!(
                "since must be >= 0, got {since}"
            )));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(DomainError::Validation("limit must be >= 1".to_owned()));
        }

        Ok(Self {
            since,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Returns true when the event at `timestamp` falls after the cursor.
    #[must_use]
    pub fn admits(&self, timestamp: i64) -> bool {
        self.since <= 0 || timestamp > self.since
    }
}
