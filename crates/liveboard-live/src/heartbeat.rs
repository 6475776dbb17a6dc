//! Capped heartbeat channel.
//!
//! Emits `connected` immediately, then one heartbeat per tick until the
//! emitted-frame counter reaches the cap, then closes. It never reads the
//! event log, so it carries no domain events; it only signals liveness.

use std::sync::Arc;

use futures::Stream;
use liveboard_core::clock::Clock;
use serde_json::json;
use tokio::time::{Instant, sleep_until};
use tracing::info;
use uuid::Uuid;

use crate::config::ChannelConfig;
use crate::frame::{CONNECTED_MESSAGE, Frame};
use crate::signal::CloseSignal;

/// Lifecycle of a heartbeat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatState {
    /// Nothing emitted yet.
    Init,
    /// `connected` sent; heartbeats on each tick.
    Streaming,
    /// Finished; emits nothing further.
    Closed,
}

/// A per-connection heartbeat emitter.
pub struct HeartbeatChannel {
    id: Uuid,
    clock: Arc<dyn Clock>,
    config: ChannelConfig,
    state: HeartbeatState,
    emitted: u32,
    next_tick: Instant,
    signal: CloseSignal,
}

impl HeartbeatChannel {
    /// Creates a channel in the `Init` state.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: ChannelConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            clock,
            config,
            state: HeartbeatState::Init,
            emitted: 0,
            next_tick: Instant::now(),
            signal: CloseSignal::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> HeartbeatState {
        self.state
    }

    /// Frames emitted so far, including `connected`.
    #[must_use]
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Returns a handle that closes this channel.
    #[must_use]
    pub fn signal(&self) -> CloseSignal {
        self.signal.clone()
    }

    /// Waits for and returns the next frame, or `None` once closed.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        if self.signal.is_closed() {
            self.state = HeartbeatState::Closed;
        }

        match self.state {
            HeartbeatState::Closed => None,
            HeartbeatState::Init => {
                self.state = HeartbeatState::Streaming;
                self.next_tick = Instant::now() + self.config.initial_delay;
                info!(channel_id = %self.id, "heartbeat channel opened");
                let frame = Frame::connected(
                    self.clock.now_millis(),
                    json!({ "message": CONNECTED_MESSAGE }),
                );
                self.emit(frame)
            }
            HeartbeatState::Streaming => {
                sleep_until(self.next_tick).await;
                self.next_tick += self.config.tick_interval();

                if self.emitted >= self.config.heartbeat_cap {
                    self.state = HeartbeatState::Closed;
                    if self.signal.close() {
                        info!(
                            channel_id = %self.id,
                            emitted = self.emitted,
                            "heartbeat channel reached its cap"
                        );
                    }
                    return None;
                }

                let frame = Frame::heartbeat(self.clock.now_millis(), self.emitted);
                self.emit(frame)
            }
        }
    }

    fn emit(&mut self, frame: Frame) -> Option<Frame> {
        if self.signal.is_closed() {
            self.state = HeartbeatState::Closed;
            return None;
        }
        self.emitted += 1;
        Some(frame)
    }

    /// Turns the channel into a stream of frames that ends when it closes.
    pub fn into_stream(self) -> impl Stream<Item = Frame> + Send + 'static {
        futures::stream::unfold(self, |mut channel| async move {
            let frame = channel.next_frame().await?;
            Some((frame, channel))
        })
    }
}

impl Drop for HeartbeatChannel {
    fn drop(&mut self) {
        if self.signal.close() {
            info!(
                channel_id = %self.id,
                emitted = self.emitted,
                "heartbeat channel cancelled by client"
            );
        }
    }
}
