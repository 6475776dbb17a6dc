//! Channel timing and sizing.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Which channel design a deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveMode {
    /// Poll the event log and forward new events.
    #[default]
    Poll,
    /// Emit a capped heartbeat sequence only.
    Heartbeat,
}

impl LiveMode {
    /// The name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poll => "poll",
            Self::Heartbeat => "heartbeat",
        }
    }
}

/// Error returned when parsing an unknown [`LiveMode`].
#[derive(Debug, Error)]
#[error("unknown live mode '{0}', expected 'poll' or 'heartbeat'")]
pub struct UnknownLiveMode(pub String);

impl FromStr for LiveMode {
    type Err = UnknownLiveMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poll" | "polling" => Ok(Self::Poll),
            "heartbeat" => Ok(Self::Heartbeat),
            other => Err(UnknownLiveMode(other.to_owned())),
        }
    }
}

/// Shortest tick interval a channel will use.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Timing and sizing for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Delay before the first heartbeat.
    pub initial_delay: Duration,
    /// Number of frames (including `connected`) after which a heartbeat
    /// channel closes itself.
    pub heartbeat_cap: u32,
    /// Events requested per poll.
    pub poll_limit: usize,
    /// Upper bound on a polling channel's life.
    pub max_lifetime: Option<Duration>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            initial_delay: Duration::from_millis(1000),
            heartbeat_cap: 10,
            poll_limit: 10,
            max_lifetime: None,
        }
    }
}

impl ChannelConfig {
    pub(crate) fn tick_interval(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    pub(crate) fn batch_limit(&self) -> usize {
        self.poll_limit.max(1)
    }
}
