//! Feature service — motion-sensor enablement and webcam brightness.

use std::sync::Arc;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::event::StateChange;
use pumpkinpi_domain::feature::{Brightness, Feature};

use crate::device_state::{DeviceState, Toggle, not_found};
use crate::ports::EventPublisher;
use crate::services::broadcast;

/// Partial update of a feature, as received from a client.
///
/// `brightness` stays a raw string so that validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureUpdate {
    pub enabled: Option<bool>,
    pub brightness: Option<String>,
}

/// Application service for feature toggles.
pub struct FeatureService<P, E> {
    state: Arc<DeviceState<P>>,
    publisher: E,
}

impl<P, E> FeatureService<P, E>
where
    P: Send + Sync,
    E: EventPublisher + Send + Sync,
{
    pub fn new(state: Arc<DeviceState<P>>, publisher: E) -> Self {
        Self { state, publisher }
    }

    #[must_use]
    pub fn list_features(&self) -> Vec<Feature> {
        self.state.features()
    }

    /// Look up a feature by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] when the id is not in the catalog.
    pub fn get_feature(&self, id: &str) -> Result<Feature, PumpkinError> {
        self.state.feature(id).ok_or_else(|| not_found("feature", id))
    }

    /// Set a feature's `enabled` flag.
    ///
    /// The device-state toggle `<id>-enabled` follows only when it exists;
    /// the update is broadcast either way.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] when the id is not in the catalog.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<Feature, PumpkinError> {
        let feature = self.state.with_feature(id, |feature| {
            feature.enabled = Some(enabled);
            let mirrored = self
                .state
                .update_toggle(&feature.enabled_key(), |toggle| *toggle = Toggle::Enabled(enabled));
            if !mirrored {
                tracing::debug!(feature = %feature.id, "no device toggle for enabled flag");
            }
            feature.clone()
        })?;
        tracing::info!(feature = %feature.id, enabled, "feature updated");
        broadcast(&self.publisher, StateChange::FeatureUpdate(feature.clone())).await;
        Ok(feature)
    }

    /// Set a feature's brightness from a raw client value.
    ///
    /// Accepts `auto-toggle` or an integer in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id, or
    /// [`PumpkinError::InvalidInput`] for any other value. Nothing is
    /// mutated or broadcast on error.
    pub async fn set_brightness(&self, id: &str, raw: &str) -> Result<Feature, PumpkinError> {
        self.get_feature(id)?;
        let brightness: Brightness = raw.parse()?;
        self.apply_brightness(id, brightness).await
    }

    async fn apply_brightness(
        &self,
        id: &str,
        brightness: Brightness,
    ) -> Result<Feature, PumpkinError> {
        let feature = self.state.with_feature(id, |feature| {
            feature.brightness = Some(brightness);
            self.state.update_toggle(&feature.brightness_key(), |toggle| {
                *toggle = Toggle::Brightness(brightness);
            });
            feature.clone()
        })?;
        tracing::info!(feature = %feature.id, %brightness, "feature updated");
        broadcast(&self.publisher, StateChange::FeatureUpdate(feature.clone())).await;
        Ok(feature)
    }

    /// Apply a partial update: `enabled` first, then `brightness`.
    ///
    /// The brightness is parsed before anything is applied. An empty update
    /// returns the feature unchanged without broadcasting.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] for an unknown id, or
    /// [`PumpkinError::InvalidInput`] when the brightness is invalid. Nothing
    /// is mutated or broadcast on error.
    pub async fn update(&self, id: &str, update: FeatureUpdate) -> Result<Feature, PumpkinError> {
        let mut feature = self.get_feature(id)?;
        let brightness = update
            .brightness
            .as_deref()
            .map(str::parse::<Brightness>)
            .transpose()?;
        if let Some(enabled) = update.enabled {
            feature = self.set_enabled(id, enabled).await?;
        }
        if let Some(brightness) = brightness {
            feature = self.apply_brightness(id, brightness).await?;
        }
        Ok(feature)
    }
}
