//! Shared closed flag for a single channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Closed flag shared between a channel and whoever may cancel it.
///
/// Closing is idempotent: only the first call reports the transition, so
/// the timer path and the disconnect path can both close without
/// double-reporting.
#[derive(Debug, Clone, Default)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    /// Creates an open signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the channel closed. Returns `true` if this call closed it.
    pub fn close(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` once any holder has closed the signal.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
