//! Shared application state for axum handlers.

use std::sync::Arc;

use pumpkinpi_app::event_bus::InProcessEventBus;
use pumpkinpi_app::services::feature_service::FeatureService;
use pumpkinpi_app::services::led_service::LedService;
use pumpkinpi_app::services::photo_service::PhotoService;
use pumpkinpi_app::services::sound_service::SoundService;

/// Application state shared across all axum handlers.
///
/// Generic over the output pin, event publisher, command runner, and file
/// system types to avoid dynamic dispatch. `Clone` is implemented manually
/// so that only the `Arc` wrappers are cloned.
pub struct AppState<P, E, R, L> {
    pub leds: Arc<LedService<P, E>>,
    pub features: Arc<FeatureService<P, E>>,
    pub sounds: Arc<SoundService<P, R>>,
    pub photos: Arc<PhotoService<P, E, R, L>>,
    /// Bus the services publish to; the SSE stream subscribes here.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<P, E, R, L> Clone for AppState<P, E, R, L> {
    fn clone(&self) -> Self {
        Self {
            leds: Arc::clone(&self.leds),
            features: Arc::clone(&self.features),
            sounds: Arc::clone(&self.sounds),
            photos: Arc::clone(&self.photos),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<P, E, R, L> AppState<P, E, R, L> {
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The services are shared with the motion orchestrator, so they are
    /// built by the caller.
    pub fn from_arcs(
        leds: Arc<LedService<P, E>>,
        features: Arc<FeatureService<P, E>>,
        sounds: Arc<SoundService<P, R>>,
        photos: Arc<PhotoService<P, E, R, L>>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            leds,
            features,
            sounds,
            photos,
            event_bus,
        }
    }
}
