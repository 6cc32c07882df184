//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pumpkinpi.toml` in the working directory, or the file named by
//! `PUMPKINPI_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use pumpkinpi_app::services::photo_service::CaptureSettings;
use pumpkinpi_domain::catalog::{Catalog, default_features};
use pumpkinpi_domain::feature::Brightness;
use pumpkinpi_domain::id::catalog_key;
use pumpkinpi_domain::led::Led;
use pumpkinpi_domain::sound::Sound;

const DEFAULT_PATH: &str = "pumpkinpi.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Sound and photo directories.
    pub paths: PathsConfig,
    /// GPIO backend and sensor line.
    pub gpio: GpioConfig,
    /// Motion-trigger behaviour.
    pub motion: MotionConfig,
    /// Photo capture tool.
    pub camera: CameraConfig,
    /// Sound player.
    pub audio: AudioConfig,
    /// LED catalog.
    pub leds: Vec<LedConfig>,
    /// Sound catalog.
    pub sounds: Vec<SoundConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub sounds_dir: PathBuf,
    pub photos_dir: PathBuf,
}

/// Which pin implementation drives the LEDs and the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// sysfs when writable, virtual otherwise.
    #[default]
    Auto,
    Sysfs,
    Virtual,
}

impl FromStr for GpioBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "sysfs" => Ok(Self::Sysfs),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown GPIO backend {other:?}, expected auto, sysfs or virtual"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    pub backend: GpioBackend,
    /// BCM line of the PIR sensor.
    pub motion_sensor_pin: u32,
    /// How often the sysfs sensor value is sampled.
    pub poll_interval_ms: u64,
    /// Period of synthesized edges on the virtual sensor; `0` disables them.
    pub virtual_edge_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Initial value of the `motion-sensor` feature.
    pub enabled: bool,
    /// How long LEDs stay on after an edge.
    pub led_off_delay_ms: u64,
    /// Edges buffered between the sensor and the orchestrator.
    pub edge_buffer: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub command: String,
    /// Arguments placed before `--set brightness=<n>%` and the destination.
    pub args: Vec<String>,
    /// Sound played before a non-silent capture.
    pub notification_sound: String,
    /// Initial value of the `webcam` brightness (`auto-toggle` or `0`..`100`).
    pub brightness: String,
    /// How long LEDs pulse around a non-silent capture.
    pub led_pulse_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedConfig {
    pub id: String,
    pub name: String,
    /// BCM line; an LED without one has no hardware behind it.
    #[serde(default)]
    pub pin: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SoundConfig {
    pub id: String,
    pub title: String,
    /// File name inside `paths.sounds_dir`.
    pub file: String,
}

impl Config {
    /// Load configuration from `pumpkinpi.toml` (or `PUMPKINPI_CONFIG`), if
    /// present, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PUMPKINPI_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Unparsable ports are ignored; an unknown backend name is an error.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("PUMPKINPI_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("PUMPKINPI_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some((host, port)) = lookup("PUMPKINPI_BIND")
            .as_deref()
            .and_then(|val| val.rsplit_once(':'))
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("PUMPKINPI_SOUNDS_DIR") {
            self.paths.sounds_dir = val.into();
        }
        if let Some(val) = lookup("PUMPKINPI_PHOTOS_DIR") {
            self.paths.photos_dir = val.into();
        }
        if let Some(val) = lookup("PUMPKINPI_GPIO_BACKEND") {
            self.gpio.backend = val.parse()?;
        }
        if let Some(val) = lookup("PUMPKINPI_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.motion.led_off_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "motion.led_off_delay_ms must be non-zero".to_string(),
            ));
        }
        if self.motion.edge_buffer == 0 {
            return Err(ConfigError::Validation(
                "motion.edge_buffer must be non-zero".to_string(),
            ));
        }
        unique_ids("LED", self.leds.iter().map(|led| led.id.as_str()))?;
        unique_ids("sound", self.sounds.iter().map(|sound| sound.id.as_str()))?;
        let notification = catalog_key(&self.camera.notification_sound);
        if !self
            .sounds
            .iter()
            .any(|sound| catalog_key(&sound.id) == notification)
        {
            return Err(ConfigError::Validation(format!(
                "camera.notification_sound {:?} is not a configured sound",
                self.camera.notification_sound
            )));
        }
        self.initial_brightness()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the entity catalog from the configured LEDs, sounds and
    /// initial feature values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an invalid initial brightness.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(Catalog {
            leds: self
                .leds
                .iter()
                .map(|led| Led::new(&led.id, &led.name))
                .collect(),
            features: default_features(self.motion.enabled, self.initial_brightness()?),
            sounds: self
                .sounds
                .iter()
                .map(|sound| Sound::new(&sound.id, &sound.title, &sound.file))
                .collect(),
        })
    }

    #[must_use]
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            command: self.camera.command.clone(),
            args: self.camera.args.clone(),
            notification_sound: self.camera.notification_sound.clone(),
            led_pulse: Duration::from_millis(self.camera.led_pulse_ms),
        }
    }

    #[must_use]
    pub fn led_off_delay(&self) -> Duration {
        Duration::from_millis(self.motion.led_off_delay_ms)
    }

    /// `None` when the virtual sensor should never fire on its own.
    #[must_use]
    pub fn virtual_edge_interval(&self) -> Option<Duration> {
        match self.gpio.virtual_edge_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    fn initial_brightness(&self) -> Result<Brightness, ConfigError> {
        self.camera.brightness.parse().map_err(|err| {
            ConfigError::Validation(format!("camera.brightness: {err}"))
        })
    }
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        let key = catalog_key(id.trim());
        if key.is_empty() {
            return Err(ConfigError::Validation(format!("{kind} id must not be empty")));
        }
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!("duplicate {kind} id {id:?}")));
        }
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            gpio: GpioConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraConfig::default(),
            audio: AudioConfig::default(),
            leds: default_leds(),
            sounds: default_sounds(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pumpkinpi=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sounds_dir: PathBuf::from("sounds"),
            photos_dir: PathBuf::from("photos"),
        }
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            backend: GpioBackend::Auto,
            motion_sensor_pin: 4,
            poll_interval_ms: 50,
            virtual_edge_interval_secs: 5,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            led_off_delay_ms: 2000,
            edge_buffer: 16,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let capture = CaptureSettings::default();
        Self {
            command: capture.command,
            args: capture.args,
            notification_sound: capture.notification_sound,
            brightness: "auto-toggle".to_string(),
            led_pulse_ms: 2000,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            command: "aplay".to_string(),
        }
    }
}

fn default_leds() -> Vec<LedConfig> {
    vec![
        LedConfig {
            id: "led1".to_string(),
            name: "Left eye".to_string(),
            pin: Some(17),
        },
        LedConfig {
            id: "led2".to_string(),
            name: "Right eye".to_string(),
            pin: Some(27),
        },
    ]
}

fn default_sounds() -> Vec<SoundConfig> {
    Catalog::default()
        .sounds
        .into_iter()
        .map(|sound| SoundConfig {
            id: sound.id,
            title: sound.title,
            file: sound.file,
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
