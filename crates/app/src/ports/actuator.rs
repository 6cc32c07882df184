//! Actuator port — binary output pins and edge-notifying input pins.
//!
//! Physical GPIO and the virtual fallback both implement these traits, so
//! the services and the orchestrator run unchanged on either backend.

use tokio::sync::mpsc;

use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::led::LedStatus;
use pumpkinpi_domain::time::{Timestamp, now};

/// Logic level driven onto an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<LedStatus> for Level {
    fn from(status: LedStatus) -> Self {
        match status {
            LedStatus::On => Self::High,
            LedStatus::Off => Self::Low,
        }
    }
}

/// A rising edge observed on an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at: Timestamp,
}

impl Edge {
    #[must_use]
    pub fn now() -> Self {
        Self { at: now() }
    }
}

/// A binary output device such as an LED.
pub trait OutputPin: Send + Sync {
    /// Drive the pin to `level`.
    ///
    /// Idempotent and synchronous; returns once the underlying write
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns a [`PumpkinError::Device`] when the hardware write fails.
    fn write(&self, level: Level) -> Result<(), PumpkinError>;
}

/// An input device that reports rising edges, such as a PIR motion sensor.
pub trait InputPin: Send + Sync {
    /// Start delivering rising edges on a dedicated channel.
    ///
    /// Edges are pushed with `try_send`, so a consumer that falls behind
    /// loses edges instead of stalling the watcher. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`PumpkinError::Device`] when the pin cannot be configured
    /// for edge detection.
    fn watch(&self) -> Result<mpsc::Receiver<Edge>, PumpkinError>;

    /// Cancel every watcher started by [`watch`](Self::watch).
    ///
    /// Safe to call any number of times.
    fn unwatch_all(&self);
}
