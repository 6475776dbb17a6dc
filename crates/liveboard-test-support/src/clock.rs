//! Test clocks — deterministic `Clock` implementations for tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use liveboard_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock fixed at the given milliseconds since epoch.
    ///
    /// # Panics
    ///
    /// Panics if `millis` is outside chrono's representable range.
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock the test moves forward explicitly.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock starting at `millis` since epoch.
    ///
    /// # Panics
    ///
    /// Panics if `millis` is outside chrono's representable range.
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_millis_opt(millis).unwrap()),
        }
    }

    /// Moves the clock forward by `millis`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::milliseconds(millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
