//! In-process state broadcast backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::event::Event;

use crate::ports::EventPublisher;

/// Fan-out of state-change events to every connected observer.
///
/// Publishing never waits on an observer. Each subscriber has its own
/// bounded ring of `capacity` events; one that falls further behind skips
/// the oldest events (`RecvError::Lagged`) while everybody else keeps up.
/// Per subscriber, events arrive in publish order.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given per-subscriber capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created. There is no replay.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Number of currently connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PumpkinError>> + Send {
        let topic = event.topic();
        // send only fails with zero receivers; the event is simply dropped
        if self.sender.send(event).is_err() {
            tracing::trace!(%topic, "no observers connected, event dropped");
        }
        async { Ok(()) }
    }
}
