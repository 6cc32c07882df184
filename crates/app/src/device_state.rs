//! Shared device state — the single mutable context handed to every service.
//!
//! Built once at startup from the [`Catalog`] and the output pins. Every
//! entry has its own mutex, so a read-modify-write on one key is atomic and
//! never contends with writes to another key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pumpkinpi_domain::catalog::Catalog;
use pumpkinpi_domain::error::{NotFoundError, PumpkinError};
use pumpkinpi_domain::feature::{Brightness, Feature, MOTION_SENSOR, WEBCAM, brightness_key, enabled_key};
use pumpkinpi_domain::id::catalog_key;
use pumpkinpi_domain::led::Led;

/// Value held by a device-state toggle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enabled(bool),
    Brightness(Brightness),
}

struct LedSlot<P> {
    id: String,
    led: Mutex<Led>,
    pin: Option<P>,
}

/// Process-wide device state.
///
/// Output pins are owned here and only reachable through
/// [`with_led`](Self::with_led), which the LED service uses while holding
/// the LED's lock.
pub struct DeviceState<P> {
    leds: Vec<LedSlot<P>>,
    features: Vec<(String, Mutex<Feature>)>,
    toggles: HashMap<String, Mutex<Toggle>>,
    sounds_dir: PathBuf,
    photos_dir: PathBuf,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P> DeviceState<P> {
    /// Build the state from the catalog.
    ///
    /// `pins` is keyed by LED id. An LED without a pin is purely virtual;
    /// a pin whose id is not in the catalog is dropped.
    #[must_use]
    pub fn new(
        catalog: &Catalog,
        pins: HashMap<String, P>,
        sounds_dir: impl Into<PathBuf>,
        photos_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut pins: HashMap<String, P> = pins
            .into_iter()
            .map(|(id, pin)| (catalog_key(&id), pin))
            .collect();

        let leds = catalog
            .leds
            .iter()
            .map(|led| LedSlot {
                id: led.id.clone(),
                pin: pins.remove(&led.id),
                led: Mutex::new(led.clone()),
            })
            .collect();

        for id in pins.keys() {
            tracing::warn!(led = %id, "pin configured for unknown LED, ignoring");
        }

        let mut toggles = HashMap::new();
        for feature in &catalog.features {
            if let Some(enabled) = feature.enabled {
                toggles.insert(feature.enabled_key(), Mutex::new(Toggle::Enabled(enabled)));
            }
            if let Some(brightness) = feature.brightness {
                toggles.insert(
                    feature.brightness_key(),
                    Mutex::new(Toggle::Brightness(brightness)),
                );
            }
        }

        Self {
            leds,
            features: catalog
                .features
                .iter()
                .map(|feature| (feature.id.clone(), Mutex::new(feature.clone())))
                .collect(),
            toggles,
            sounds_dir: sounds_dir.into(),
            photos_dir: photos_dir.into(),
        }
    }

    #[must_use]
    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    #[must_use]
    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Current value of a toggle key, `None` when the key does not exist.
    #[must_use]
    pub fn toggle(&self, key: &str) -> Option<Toggle> {
        self.toggles.get(key).map(|slot| *lock(slot))
    }

    /// Atomically update a toggle key in place.
    ///
    /// Returns `false`, without calling `update`, when the key does not
    /// exist. Keys are never created after startup.
    pub fn update_toggle(&self, key: &str, update: impl FnOnce(&mut Toggle)) -> bool {
        match self.toggles.get(key) {
            Some(slot) => {
                update(&mut lock(slot));
                true
            }
            None => false,
        }
    }

    /// Whether motion edges should trigger a reaction.
    #[must_use]
    pub fn motion_sensor_enabled(&self) -> bool {
        matches!(
            self.toggle(&enabled_key(MOTION_SENSOR)),
            Some(Toggle::Enabled(true))
        )
    }

    /// Brightness mode used by the next capture, if configured.
    #[must_use]
    pub fn webcam_brightness(&self) -> Option<Brightness> {
        match self.toggle(&brightness_key(WEBCAM)) {
            Some(Toggle::Brightness(brightness)) => Some(brightness),
            _ => None,
        }
    }

    #[must_use]
    pub fn led_ids(&self) -> Vec<String> {
        self.leds.iter().map(|slot| slot.id.clone()).collect()
    }

    #[must_use]
    pub fn leds(&self) -> Vec<Led> {
        self.leds.iter().map(|slot| lock(&slot.led).clone()).collect()
    }

    #[must_use]
    pub fn led(&self, id: &str) -> Option<Led> {
        self.led_slot(id).map(|slot| lock(&slot.led).clone())
    }

    /// Run `f` on an LED and its pin while holding the LED's lock.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id, otherwise
    /// whatever `f` returns.
    pub(crate) fn with_led<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Led, Option<&P>) -> Result<T, PumpkinError>,
    ) -> Result<T, PumpkinError> {
        let slot = self.led_slot(id).ok_or_else(|| not_found("led", id))?;
        let mut led = lock(&slot.led);
        f(&mut led, slot.pin.as_ref())
    }

    #[must_use]
    pub fn features(&self) -> Vec<Feature> {
        self.features.iter().map(|(_, slot)| lock(slot).clone()).collect()
    }

    #[must_use]
    pub fn feature(&self, id: &str) -> Option<Feature> {
        self.feature_slot(id).map(|slot| lock(slot).clone())
    }

    /// Run `f` on a feature while holding its lock.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id.
    pub(crate) fn with_feature<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Feature) -> T,
    ) -> Result<T, PumpkinError> {
        let slot = self.feature_slot(id).ok_or_else(|| not_found("feature", id))?;
        Ok(f(&mut lock(slot)))
    }

    fn led_slot(&self, id: &str) -> Option<&LedSlot<P>> {
        let key = catalog_key(id);
        self.leds.iter().find(|slot| slot.id == key)
    }

    fn feature_slot(&self, id: &str) -> Option<&Mutex<Feature>> {
        let key = catalog_key(id);
        self.features
            .iter()
            .find_map(|(id, slot)| (*id == key).then_some(slot))
    }
}

pub(crate) fn not_found(entity: &'static str, id: &str) -> PumpkinError {
    NotFoundError::Entity {
        entity,
        id: id.to_string(),
    }
    .into()
}
