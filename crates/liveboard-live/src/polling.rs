//! Polling bridge channel.
//!
//! Re-reads the event log on every tick and forwards events newer than the
//! channel's cursor. The log is read newest first; each batch is reversed so
//! the subscriber sees events in chronological order, and the cursor moves
//! to each event's timestamp as it is emitted.
//!
//! Ordering holds for event frames only: their timestamps never decrease
//! within one channel. Control frames (`connected`, `error`) are stamped
//! with the clock's current time and may be newer than the events that
//! follow them.
//!
//! A failed read becomes an `error` frame and polling continues on the next
//! tick. The closed flag is checked before every emission, so nothing is
//! emitted after cancellation even when it lands mid-poll.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::Stream;
use liveboard_core::clock::Clock;
use liveboard_core::event::StoredEvent;
use liveboard_core::repository::EventQueryService;
use serde_json::json;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ChannelConfig;
use crate::frame::{CONNECTED_MESSAGE, Frame};
use crate::signal::CloseSignal;

/// Lifecycle of a polling channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingState {
    /// Nothing emitted yet.
    Init,
    /// `connected` sent; polling each tick.
    Polling,
    /// Finished; emits nothing further.
    Closed,
}

/// A per-connection bridge from the event log to one subscriber.
pub struct PollingChannel {
    id: Uuid,
    events: Arc<dyn EventQueryService>,
    clock: Arc<dyn Clock>,
    config: ChannelConfig,
    state: PollingState,
    cursor: i64,
    pending: VecDeque<StoredEvent>,
    ticker: Option<Interval>,
    deadline: Option<Instant>,
    signal: CloseSignal,
}

impl PollingChannel {
    /// Creates a channel in the `Init` state with `since` as its cursor.
    /// Negative cursors are treated as 0.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventQueryService>,
        clock: Arc<dyn Clock>,
        config: ChannelConfig,
        since: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            events,
            clock,
            config,
            state: PollingState::Init,
            cursor: since.max(0),
            pending: VecDeque::new(),
            ticker: None,
            deadline: None,
            signal: CloseSignal::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PollingState {
        self.state
    }

    /// Timestamp of the last event emitted (or the initial cursor).
    #[must_use]
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Returns a handle that closes this channel.
    #[must_use]
    pub fn signal(&self) -> CloseSignal {
        self.signal.clone()
    }

    /// Waits for and returns the next frame, or `None` once closed.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            if self.signal.is_closed() {
                self.state = PollingState::Closed;
                self.ticker = None;
                self.pending.clear();
                return None;
            }

            match self.state {
                PollingState::Closed => return None,
                PollingState::Init => return Some(self.open()),
                PollingState::Polling => {
                    if let Some(event) = self.pending.pop_front() {
                        self.cursor = self.cursor.max(event.timestamp);
                        return Some(Frame::from_event(&event));
                    }
                    if let Some(frame) = self.poll().await {
                        return Some(frame);
                    }
                }
            }
        }
    }

    fn open(&mut self) -> Frame {
        let now = Instant::now();
        let period = self.config.tick_interval();
        let mut ticker = interval_at(now + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.deadline = self.config.max_lifetime.map(|lifetime| now + lifetime);
        self.state = PollingState::Polling;

        info!(channel_id = %self.id, since = self.cursor, "polling channel opened");

        Frame::connected(
            self.clock.now_millis(),
            json!({ "message": CONNECTED_MESSAGE, "since": self.cursor }),
        )
    }

    /// Waits for the next tick and reads the log. Queued events are left in
    /// `pending`; a failed read is returned as an error frame.
    async fn poll(&mut self) -> Option<Frame> {
        self.ticker.as_mut()?.tick().await;

        if self.signal.is_closed() {
            return None;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.finish("max lifetime reached");
            return None;
        }

        let result = self
            .events
            .get_recent(self.cursor, self.config.batch_limit())
            .await;

        if self.signal.is_closed() {
            return None;
        }

        match result {
            Ok(mut batch) => {
                if !batch.is_empty() {
                    debug!(
                        channel_id = %self.id,
                        cursor = self.cursor,
                        count = batch.len(),
                        "polling channel received events"
                    );
                }
                batch.reverse();
                self.pending.extend(batch);
                None
            }
            Err(err) => {
                warn!(channel_id = %self.id, error = %err, "polling channel query failed");
                Some(Frame::error(self.clock.now_millis(), &err.to_string()))
            }
        }
    }

    fn finish(&mut self, reason: &str) {
        self.state = PollingState::Closed;
        self.ticker = None;
        self.pending.clear();
        if self.signal.close() {
            info!(channel_id = %self.id, cursor = self.cursor, reason, "polling channel closed");
        }
    }

    /// Turns the channel into a stream of frames that ends when it closes.
    pub fn into_stream(self) -> impl Stream<Item = Frame> + Send + 'static {
        futures::stream::unfold(self, |mut channel| async move {
            let frame = channel.next_frame().await?;
            Some((frame, channel))
        })
    }
}

impl Drop for PollingChannel {
    fn drop(&mut self) {
        if self.signal.close() {
            info!(
                channel_id = %self.id,
                cursor = self.cursor,
                "polling channel cancelled by client"
            );
        }
    }
}
