//! Application services — the control services behind every request.
//!
//! Each service struct accepts port implementations via generic parameters
//! (constructor injection) and shares one [`DeviceState`](crate::device_state::DeviceState).

pub mod feature_service;
pub mod led_service;
pub mod photo_service;
pub mod sound_service;

use pumpkinpi_domain::event::{Event, StateChange};

use crate::ports::EventPublisher;

/// Publish a state change after the mutation it describes.
///
/// A failed publish never fails the mutation; it is only logged.
pub(crate) async fn broadcast<E: EventPublisher>(publisher: &E, change: StateChange) {
    let topic = change.topic();
    if let Err(err) = publisher.publish(Event::new(change)).await {
        tracing::warn!(%topic, error = ?err, "failed to broadcast state change");
    }
}
