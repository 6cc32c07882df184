//! Linux sysfs GPIO backend (`/sys/class/gpio`).
//!
//! Output writes are synchronous file writes. Inputs are watched by a
//! polling task that reads `value` and reports every 0 → 1 transition.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use pumpkinpi_app::ports::{Edge, InputPin, Level, OutputPin};
use pumpkinpi_domain::error::PumpkinError;

use crate::error::GpioError;

/// Default sysfs GPIO class directory.
pub const SYSFS_ROOT: &str = "/sys/class/gpio";

/// First wait before retrying a freshly exported line; doubled each time.
const CONFIGURE_FIRST_DELAY: Duration = Duration::from_millis(10);
/// Total time a freshly exported line is given to become writable.
const CONFIGURE_BUDGET: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// How an input pin is watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub poll_interval: Duration,
    /// Edges buffered for a slow consumer before new ones are dropped.
    pub buffer: usize,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            buffer: 16,
        }
    }
}

/// Whether the sysfs interface under `root` can be used by this process.
#[must_use]
pub fn sysfs_available(root: &Path) -> bool {
    OpenOptions::new().write(true).open(root.join("export")).is_ok()
}

/// An exported sysfs GPIO line. Unexported on drop.
pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    direction: Direction,
    watch: WatchSettings,
    watchers: Mutex<Vec<JoinHandle<()>>>,
}

impl SysfsPin {
    /// Export `number` under `root` and configure it as an output, driven low.
    ///
    /// # Errors
    ///
    /// Returns a [`GpioError`] when exporting or configuring fails.
    pub fn output(root: impl Into<PathBuf>, number: u32) -> Result<Self, GpioError> {
        let pin = Self::open(root.into(), number, Direction::Out, WatchSettings::default())?;
        pin.write_level(Level::Low)?;
        Ok(pin)
    }

    /// Export `number` under `root` and configure it as an input.
    ///
    /// # Errors
    ///
    /// Returns a [`GpioError`] when exporting or configuring fails.
    pub fn input(
        root: impl Into<PathBuf>,
        number: u32,
        watch: WatchSettings,
    ) -> Result<Self, GpioError> {
        Self::open(root.into(), number, Direction::In, watch)
    }

    fn open(
        root: PathBuf,
        number: u32,
        direction: Direction,
        watch: WatchSettings,
    ) -> Result<Self, GpioError> {
        let line = root.join(format!("gpio{number}"));
        if !line.exists() {
            fs::write(root.join("export"), number.to_string())
                .map_err(|source| GpioError::Export { pin: number, source })?;
            tracing::debug!(pin = number, "GPIO exported");
        }
        write_direction(&line, direction)
            .map_err(|source| GpioError::Configure { pin: number, source })?;
        tracing::info!(pin = number, direction = direction.as_str(), "GPIO configured");

        Ok(Self {
            number,
            root,
            direction,
            watch,
            watchers: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    fn value_path(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.number)).join("value")
    }

    fn write_level(&self, level: Level) -> Result<(), GpioError> {
        let value = match level {
            Level::High => "1",
            Level::Low => "0",
        };
        fs::write(self.value_path(), value).map_err(|source| GpioError::Write {
            pin: self.number,
            source,
        })
    }
}

/// Write `direction`, waiting for udev to create the line and fix its
/// permissions after an export.
fn write_direction(line: &Path, direction: Direction) -> std::io::Result<()> {
    let path = line.join("direction");
    let mut delay = CONFIGURE_FIRST_DELAY;
    let mut waited = Duration::ZERO;
    loop {
        match fs::write(&path, direction.as_str()) {
            Ok(()) => return Ok(()),
            Err(err)
                if waited < CONFIGURE_BUDGET
                    && matches!(err.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) =>
            {
                tracing::debug!(path = %path.display(), %err, "GPIO line not ready yet");
                std::thread::sleep(delay);
                waited += delay;
                delay = (delay * 2).min(CONFIGURE_BUDGET.saturating_sub(waited));
            }
            Err(err) => return Err(err),
        }
    }
}

impl OutputPin for SysfsPin {
    fn write(&self, level: Level) -> Result<(), PumpkinError> {
        self.write_level(level)?;
        tracing::debug!(pin = self.number, ?level, "GPIO written");
        Ok(())
    }
}

impl InputPin for SysfsPin {
    fn watch(&self) -> Result<mpsc::Receiver<Edge>, PumpkinError> {
        if self.direction != Direction::In {
            return Err(GpioError::NotAnInput { pin: self.number }.into());
        }
        let (tx, rx) = mpsc::channel(self.watch.buffer.max(1));
        let path = self.value_path();
        let pin = self.number;
        let poll_interval = self.watch.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut previous_high = None;
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                let high = match tokio::fs::read_to_string(&path).await {
                    Ok(raw) => raw.trim() == "1",
                    Err(err) => {
                        tracing::warn!(pin, %err, "unable to read GPIO value");
                        continue;
                    }
                };
                if high && previous_high == Some(false) {
                    match tx.try_send(Edge::now()) {
                        Ok(()) => {}
                        Err(TrySendError::Closed(_)) => break,
                        Err(TrySendError::Full(_)) => {
                            tracing::debug!(pin, "edge dropped, consumer is behind");
                        }
                    }
                }
                previous_high = Some(high);
            }
        });

        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
        tracing::info!(pin = self.number, "watching GPIO for rising edges");
        Ok(rx)
    }

    fn unwatch_all(&self) {
        let handles: Vec<_> = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            handle.abort();
        }
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        self.unwatch_all();
        match fs::write(self.root.join("unexport"), self.number.to_string()) {
            Ok(()) => tracing::debug!(pin = self.number, "GPIO unexported"),
            Err(err) => tracing::warn!(pin = self.number, %err, "unable to unexport GPIO"),
        }
    }
}
