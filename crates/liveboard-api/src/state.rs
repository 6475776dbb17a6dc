//! Shared application state.

use std::future::Future;
use std::sync::Arc;

use liveboard_core::clock::Clock;
use liveboard_core::repository::{EventQueryService, MessageRepository, TaskRepository};
use liveboard_live::{ChannelConfig, LiveMode};
use tokio::sync::watch;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used for event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Read side of the event log.
    pub events: Arc<dyn EventQueryService>,
    /// Message persistence.
    pub messages: Arc<dyn MessageRepository>,
    /// Task persistence.
    pub tasks: Arc<dyn TaskRepository>,
    /// Which live channel design `/api/events` serves.
    pub live_mode: LiveMode,
    /// Timing and sizing for live channels.
    pub channel_config: ChannelConfig,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create new application state with every store trait backed by `store`.
    #[must_use]
    pub fn new<S>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        live_mode: LiveMode,
        channel_config: ChannelConfig,
    ) -> Self
    where
        S: EventQueryService + MessageRepository + TaskRepository + 'static,
    {
        let (shutdown, _) = watch::channel(false);
        Self {
            clock,
            events: store.clone(),
            messages: store.clone(),
            tasks: store,
            live_mode,
            channel_config,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Tells open live streams to end.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once [`begin_shutdown`](Self::begin_shutdown) is called.
    ///
    /// Never resolves if every copy of the state is dropped first.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown.subscribe();
        async move {
            if rx.wait_for(|down| *down).await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
