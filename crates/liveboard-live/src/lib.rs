//! Liveboard live update channels.
//!
//! A channel is a per-connection, server-to-client stream of [`Frame`]s. Two
//! designs are provided:
//!
//! - [`HeartbeatChannel`] emits a `connected` frame and a capped run of
//!   content-free heartbeats, then closes itself. It needs no data store.
//! - [`PollingChannel`] re-reads the event log on a fixed interval and
//!   forwards anything newer than its cursor, oldest first.
//!
//! Channels are transport-agnostic. Each owns a [`CloseSignal`]; dropping the
//! channel (or its stream) closes the signal, which is how a client
//! disconnect reaches it.

pub mod config;
pub mod frame;
pub mod heartbeat;
pub mod polling;
pub mod signal;

use std::sync::Arc;

use futures::stream::BoxStream;
use liveboard_core::clock::Clock;
use liveboard_core::repository::EventQueryService;

pub use config::{ChannelConfig, LiveMode};
pub use frame::Frame;
pub use heartbeat::{HeartbeatChannel, HeartbeatState};
pub use polling::{PollingChannel, PollingState};
pub use signal::CloseSignal;

/// Opens a fresh channel of the given design.
///
/// Returns the channel's close signal alongside its frame stream. `since` is
/// the initial cursor; the heartbeat design ignores it.
pub fn open_channel(
    mode: LiveMode,
    events: Arc<dyn EventQueryService>,
    clock: Arc<dyn Clock>,
    config: ChannelConfig,
    since: i64,
) -> (CloseSignal, BoxStream<'static, Frame>) {
    match mode {
        LiveMode::Heartbeat => {
            let channel = HeartbeatChannel::new(clock, config);
            (channel.signal(), Box::pin(channel.into_stream()))
        }
        LiveMode::Poll => {
            let channel = PollingChannel::new(events, clock, config, since);
            (channel.signal(), Box::pin(channel.into_stream()))
        }
    }
}
