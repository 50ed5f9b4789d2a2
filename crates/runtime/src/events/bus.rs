//! Broadcast bus for lifecycle events.

use tokio::sync::broadcast;

use super::types::LifecycleEvent;
use crate::config::DEFAULT_EVENT_BUFFER;

/// Lifecycle event bus.
///
/// Publishing never blocks and never fails: runners publish from plain OS
/// threads, and an event without subscribers is simply dropped. Slow
/// subscribers observe `RecvError::Lagged` once more than the configured
/// capacity of events is pending.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// Creates a new event bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_BUFFER)
    }

    /// Creates a new event bus with the given capacity (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to every current subscriber
    pub fn publish(&self, event: LifecycleEvent) {
        if self.sender.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("no lifecycle event subscribers");
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
