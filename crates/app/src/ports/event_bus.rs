//! Event bus port — publish state changes to connected observers.

use std::future::Future;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::event::Event;

/// Publishes state-change events to every current subscriber.
///
/// Implementations must not block on slow observers: a publish call returns
/// as soon as the event is handed to the fan-out.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PumpkinError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PumpkinError>> + Send {
        (**self).publish(event)
    }
}
