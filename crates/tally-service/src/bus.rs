//! In-process event bus
//!
//! Two bounded FIFO channels: inbound platform events and outbound platform
//! actions. Each channel has exactly one consumer. Publishing waits while a
//! channel is full, so slow consumers throttle producers instead of losing
//! data.

use tally_core::{PlatformAction, PlatformEvent};
use tokio::sync::{mpsc, watch};

/// Capacity used when none (or zero) is configured
pub const DEFAULT_CAPACITY: usize = 128;

/// Error type for bus operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("Bus closed")]
    Closed,
}

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Publishing handle, cheap to clone and shared by all producers
#[derive(Debug, Clone)]
pub struct Bus {
    events: mpsc::Sender<PlatformEvent>,
    actions: mpsc::Sender<PlatformAction>,
    capacity: usize,
}

/// The consuming ends, handed out once at startup
#[derive(Debug)]
pub struct BusReceivers {
    pub events: mpsc::Receiver<PlatformEvent>,
    pub actions: mpsc::Receiver<PlatformAction>,
}

impl Bus {
    /// Create the bus. A capacity of zero falls back to [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> (Self, BusReceivers) {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        let (events_tx, events_rx) = mpsc::channel(capacity);
        let (actions_tx, actions_rx) = mpsc::channel(capacity);

        (
            Self {
                events: events_tx,
                actions: actions_tx,
                capacity,
            },
            BusReceivers {
                events: events_rx,
                actions: actions_rx,
            },
        )
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Publish an inbound event, waiting for room when the channel is full
    pub async fn publish_event(&self, event: PlatformEvent) -> BusResult<()> {
        self.events.send(event).await.map_err(|_| BusError::Closed)
    }

    /// Publish an outbound action, waiting for room when the channel is full
    pub async fn publish_action(&self, action: PlatformAction) -> BusResult<()> {
        self.actions.send(action).await.map_err(|_| BusError::Closed)
    }
}

// ============================================================================
// Shutdown
// ============================================================================

/// Owner side of the shared cancellation signal
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Listener side; every consumer holds one
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownSignal { rx })
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every consumer to stop at its next receive
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been triggered. A dropped [`Shutdown`]
    /// counts as triggered.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{LogEventAction, LogLevel, MessageScope, Snowflake};

    fn scope(message: i64) -> PlatformEvent {
        PlatformEvent::MessageDeleted(MessageScope {
            guild_id: Snowflake::new(1),
            channel_id: Snowflake::new(2),
            message_id: Snowflake::new(message),
        })
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let (bus, _rx) = Bus::new(0);
        assert_eq!(bus.capacity(), DEFAULT_CAPACITY);
        let (bus, _rx) = Bus::new(4);
        assert_eq!(bus.capacity(), 4);
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let (bus, mut rx) = Bus::new(8);
        for id in 1..=3 {
            bus.publish_event(scope(id)).await.unwrap();
        }
        for id in 1..=3 {
            assert_eq!(rx.events.recv().await, Some(scope(id)));
        }
    }

    #[tokio::test]
    async fn test_publish_into_closed_bus() {
        let (bus, rx) = Bus::new(1);
        drop(rx);
        let err = bus
            .publish_action(PlatformAction::LogEvent(LogEventAction::new("test", LogLevel::Info, "x")))
            .await
            .unwrap_err();
        assert_eq!(err, BusError::Closed);
    }

    #[tokio::test]
    async fn test_full_channel_applies_backpressure() {
        let (bus, mut rx) = Bus::new(1);
        bus.publish_event(scope(1)).await.unwrap();

        let pending = tokio::spawn({
            let bus = bus.clone();
            async move { bus.publish_event(scope(2)).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        assert_eq!(rx.events.recv().await, Some(scope(1)));
        pending.await.unwrap().unwrap();
        assert_eq!(rx.events.recv().await, Some(scope(2)));
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        let (shutdown, mut signal) = Shutdown::new();
        assert!(!signal.is_triggered());
        shutdown.trigger();
        signal.wait().await;
        assert!(shutdown.signal().is_triggered());
    }
}
