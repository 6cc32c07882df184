//! LED service — list, look up, and switch LEDs.

use std::sync::Arc;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::event::StateChange;
use pumpkinpi_domain::led::{Led, LedStatus};

use crate::device_state::{DeviceState, not_found};
use crate::ports::{EventPublisher, OutputPin};
use crate::services::broadcast;

/// Application service for LED state.
pub struct LedService<P, E> {
    state: Arc<DeviceState<P>>,
    publisher: E,
}

impl<P, E> LedService<P, E>
where
    P: OutputPin,
    E: EventPublisher + Send + Sync,
{
    pub fn new(state: Arc<DeviceState<P>>, publisher: E) -> Self {
        Self { state, publisher }
    }

    #[must_use]
    pub fn list_leds(&self) -> Vec<Led> {
        self.state.leds()
    }

    /// Look up an LED by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] when the id is not in the catalog.
    pub fn get_led(&self, id: &str) -> Result<Led, PumpkinError> {
        self.state.led(id).ok_or_else(|| not_found("led", id))
    }

    /// Switch an LED on or off.
    ///
    /// `requested` is `on` in any case for on; anything else means off.
    /// The pin, when the LED has one, is written before the status changes,
    /// so the status always matches what the hardware was last told.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id, or a device
    /// error when the pin write fails (status and broadcast are skipped).
    pub async fn set_status(&self, id: &str, requested: &str) -> Result<Led, PumpkinError> {
        self.apply(id, LedStatus::normalize(requested)).await
    }

    /// Apply `status` to every LED, one after the other.
    ///
    /// A failing LED is logged and skipped; the others are still updated
    /// and broadcast. Returns the LEDs that were updated.
    pub async fn set_all(&self, status: LedStatus) -> Vec<Led> {
        let mut updated = Vec::new();
        for id in self.state.led_ids() {
            match self.apply(&id, status).await {
                Ok(led) => updated.push(led),
                Err(err) => tracing::warn!(led = %id, %status, error = ?err, "failed to update LED"),
            }
        }
        updated
    }

    async fn apply(&self, id: &str, status: LedStatus) -> Result<Led, PumpkinError> {
        let led = self.state.with_led(id, |led, pin| {
            if let Some(pin) = pin {
                pin.write(status.into())?;
                tracing::debug!(led = %led.id, %status, "pin written");
            }
            led.status = status;
            Ok(led.clone())
        })?;
        tracing::info!(led = %led.id, %status, "LED updated");
        broadcast(&self.publisher, StateChange::LedUpdate(led.clone())).await;
        Ok(led)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Level;
    use crate::testing::Harness;
    use pumpkinpi_domain::event::Topic;

    #[tokio::test]
    async fn should_normalize_any_case_of_on() {
        let h = Harness::new();
        for requested in ["on", "ON", "On", "oN"] {
            let led = h.leds.set_status("led1", requested).await.unwrap();
            assert_eq!(led.status, LedStatus::On, "{requested}");
        }
    }

    #[tokio::test]
    async fn should_map_everything_else_to_off() {
        let h = Harness::new();
        for requested in ["off", "", "yes", "1", "true", "onn", " on"] {
            h.leds.set_status("led1", "on").await.unwrap();
            let led = h.leds.set_status("led1", requested).await.unwrap();
            assert_eq!(led.status, LedStatus::Off, "{requested:?}");
        }
    }

    #[tokio::test]
    async fn should_write_pin_and_publish_after_mutation() {
        let h = Harness::new();

        let led = h.leds.set_status("LED1", "on").await.unwrap();

        assert_eq!(led.id, "led1");
        assert_eq!(h.pin("led1").levels(), vec![Level::High]);
        assert_eq!(h.leds.get_led("led1").unwrap().status, LedStatus::On);
        let events = h.publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic(), Topic::LedUpdate);
        assert_eq!(events[0].change, StateChange::LedUpdate(led));
    }

    #[tokio::test]
    async fn should_tolerate_led_without_pin() {
        let h = Harness::with_pins(&["led1"]);

        let led = h.leds.set_status("led2", "on").await.unwrap();

        assert_eq!(led.status, LedStatus::On);
        assert_eq!(h.publisher.topics(), vec![Topic::LedUpdate]);
    }

    #[tokio::test]
    async fn should_fail_with_not_found_for_unknown_led() {
        let h = Harness::new();

        let result = h.leds.set_status("led9", "on").await;

        assert!(matches!(result, Err(PumpkinError::NotFound(_))));
        assert!(matches!(h.leds.get_led("led9"), Err(PumpkinError::NotFound(_))));
        assert!(h.publisher.events().is_empty());
        assert!(h.leds.list_leds().iter().all(|led| led.status == LedStatus::Off));
    }

    #[tokio::test]
    async fn should_keep_status_and_skip_publish_when_pin_write_fails() {
        let h = Harness::new();
        h.pin("led1").fail_writes(true);

        let result = h.leds.set_status("led1", "on").await;

        assert!(matches!(result, Err(PumpkinError::Device(_))));
        assert_eq!(h.leds.get_led("led1").unwrap().status, LedStatus::Off);
        assert!(h.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn should_continue_updating_remaining_leds_after_failure() {
        let h = Harness::new();
        h.pin("led1").fail_writes(true);

        let updated = h.leds.set_all(LedStatus::On).await;

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, "led2");
        assert_eq!(h.pin("led2").levels(), vec![Level::High]);
        assert_eq!(h.publisher.topics(), vec![Topic::LedUpdate]);
    }

    #[tokio::test]
    async fn should_publish_once_per_led_when_updating_all() {
        let h = Harness::new();

        let updated = h.leds.set_all(LedStatus::On).await;

        assert_eq!(updated.len(), 2);
        assert_eq!(h.publisher.topics(), vec![Topic::LedUpdate, Topic::LedUpdate]);
        assert!(h.leds.list_leds().iter().all(|led| led.status.is_on()));
    }
}
