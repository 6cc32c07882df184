//! Photo service — capture pipeline and photo directory queries.
//!
//! A capture runs the external tool and then checks the destination file:
//! the tool's exit code and diagnostics are only logged, the presence of a
//! regular file decides success.

use std::convert::identity;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use pumpkinpi_domain::error::{DeviceError, NotFoundError, PumpkinError};
use pumpkinpi_domain::event::StateChange;
use pumpkinpi_domain::feature::Brightness;
use pumpkinpi_domain::led::LedStatus;
use pumpkinpi_domain::photo::{Photo, SortOrder};
use pumpkinpi_domain::time::now;

use crate::device_state::{DeviceState, not_found};
use crate::ports::{CommandRunner, EventPublisher, FileEntry, FileSystem, OutputPin};
use crate::services::broadcast;
use crate::services::led_service::LedService;
use crate::services::sound_service::SoundService;

/// Brightness passed to the capture tool when no mode is configured.
pub const DEFAULT_CAPTURE_BRIGHTNESS: u8 = 50;

/// How the capture tool is invoked and announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub command: String,
    /// Arguments placed before `--set brightness=<n>%` and the destination.
    pub args: Vec<String>,
    /// Sound played before a non-silent capture.
    pub notification_sound: String,
    /// How long the LEDs stay on around a non-silent capture.
    pub led_pulse: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            command: "fswebcam".to_string(),
            args: ["-S", "2", "--banner-colour=#FF6A00", "--line-colour=#007F0E"]
                .map(String::from)
                .to_vec(),
            notification_sound: "smile.wav".to_string(),
            led_pulse: Duration::from_secs(2),
        }
    }
}

/// Application service for photos.
pub struct PhotoService<P, E, R, L> {
    state: Arc<DeviceState<P>>,
    leds: Arc<LedService<P, E>>,
    sounds: Arc<SoundService<P, R>>,
    runner: R,
    fs: L,
    publisher: E,
    settings: CaptureSettings,
    auto_toggle: AtomicU8,
}

impl<P, E, R, L> PhotoService<P, E, R, L>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner,
    L: FileSystem,
{
    pub fn new(
        state: Arc<DeviceState<P>>,
        leds: Arc<LedService<P, E>>,
        sounds: Arc<SoundService<P, R>>,
        runner: R,
        fs: L,
        publisher: E,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            state,
            leds,
            sounds,
            runner,
            fs,
            publisher,
            settings,
            auto_toggle: AtomicU8::new(0),
        }
    }

    /// List the photos in the photos directory.
    ///
    /// Only regular `.jpg` files are returned. With an order, photos are
    /// sorted by modification time; without one, by name.
    ///
    /// # Errors
    ///
    /// Returns a generic [`DeviceError::PhotoListing`] when the directory
    /// cannot be read.
    pub async fn list_photos(&self, order: Option<SortOrder>) -> Result<Vec<Photo>, PumpkinError> {
        let entries = self
            .fs
            .list_dir(self.state.photos_dir())
            .await
            .map_err(|err| {
                tracing::warn!(error = ?err, "unable to list photos directory");
                DeviceError::PhotoListing
            })?;

        let mut photos: Vec<FileEntry> = entries
            .into_iter()
            .filter(|entry| entry.is_file() && Photo::is_photo_filename(&entry.name))
            .collect();

        match order {
            Some(SortOrder::Asc) => photos.sort_by(|a, b| a.modified.cmp(&b.modified)),
            Some(SortOrder::Desc) => photos.sort_by(|a, b| b.modified.cmp(&a.modified)),
            None => photos.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        Ok(photos
            .into_iter()
            .map(|entry| Photo::from_filename(entry.name))
            .collect())
    }

    /// Look up a photo by file name.
    ///
    /// # Errors
    ///
    /// - [`PumpkinError::InvalidInput`] when `id` is not a plain file name.
    /// - [`PumpkinError::NotFound`] when no regular `.jpg` file has that name.
    /// - A generic [`DeviceError::PhotoAccess`] for other filesystem failures.
    pub async fn get_photo(&self, id: &str) -> Result<Photo, PumpkinError> {
        Photo::validate_id(id)?;
        if !Photo::is_photo_filename(id) {
            return Err(not_found("photo", id));
        }
        let path = self.state.photos_dir().join(id);
        match self.fs.stat(&path).await {
            Ok(Some(entry)) if entry.is_file() => Ok(Photo::from_filename(entry.name)),
            Ok(_) => Err(not_found("photo", id)),
            Err(err) => {
                tracing::warn!(photo = %id, error = ?err, "unable to access photo");
                Err(DeviceError::PhotoAccess.into())
            }
        }
    }

    /// The most recently modified photo.
    ///
    /// # Errors
    ///
    /// Returns [`PumpkinError::NotFound`] when no photo has been captured,
    /// or the listing error.
    pub async fn latest_photo(&self) -> Result<Photo, PumpkinError> {
        self.list_photos(Some(SortOrder::Desc))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NotFoundError::NoPhotos.into())
    }

    /// Capture a photo into the photos directory.
    ///
    /// Unless `silent`, the notification sound is played and every LED is
    /// pulsed on for the configured window. Those side effects run in the
    /// background and never affect the result.
    ///
    /// # Errors
    ///
    /// Returns a generic [`DeviceError::Capture`] when no regular file
    /// exists at the destination once the tool has finished.
    pub async fn capture(&self, silent: bool) -> Result<Photo, PumpkinError> {
        let filename = Photo::capture_filename(now());
        let destination = self.state.photos_dir().join(&filename);

        if !silent {
            self.announce();
        }

        let brightness = self.next_brightness();
        let mut args = self.settings.args.clone();
        args.push("--set".to_string());
        args.push(format!("brightness={brightness}%"));
        args.push(destination.to_string_lossy().into_owned());

        tracing::debug!(photo = %filename, brightness, "capturing photo");
        match self.runner.run(&self.settings.command, &args).await {
            Ok(output) => tracing::debug!(
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "capture command finished"
            ),
            Err(err) => tracing::warn!(error = ?err, "capture command failed to run"),
        }

        match self.fs.stat(&destination).await {
            Ok(Some(entry)) if entry.is_file() => {
                let photo = Photo::from_filename(filename);
                tracing::info!(photo = %photo.id, "photo captured");
                broadcast(&self.publisher, StateChange::PhotoUpdate(photo.clone())).await;
                Ok(photo)
            }
            Ok(_) => {
                tracing::warn!(photo = %filename, "capture produced no photo file");
                Err(DeviceError::Capture.into())
            }
            Err(err) => {
                tracing::warn!(photo = %filename, error = ?err, "unable to verify captured photo");
                Err(DeviceError::Capture.into())
            }
        }
    }

    /// Brightness for the next capture; flips the auto-toggle value.
    fn next_brightness(&self) -> u8 {
        match self.state.webcam_brightness() {
            Some(Brightness::AutoToggle) => self
                .auto_toggle
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                    Some(if current == 0 { Brightness::MAX } else { 0 })
                })
                .unwrap_or_else(identity),
            Some(Brightness::Level(level)) => level,
            None => DEFAULT_CAPTURE_BRIGHTNESS,
        }
    }

    fn announce(&self) {
        if let Err(err) = self.sounds.play(&self.settings.notification_sound) {
            tracing::warn!(error = ?err, "notification sound unavailable");
        }
        let leds = Arc::clone(&self.leds);
        let pulse = self.settings.led_pulse;
        tokio::spawn(async move {
            leds.set_all(LedStatus::On).await;
            tokio::time::sleep(pulse).await;
            leds.set_all(LedStatus::Off).await;
        });
    }
}
