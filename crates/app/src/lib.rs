//! # pumpkinpi-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `OutputPin` / `InputPin` — LEDs and the motion sensor
//!   - `EventPublisher` — push state changes to observers
//!   - `CommandRunner` — external audio player and capture tool
//!   - `FileSystem` — photo directory listings and file metadata
//! - Hold the **shared device state** (`DeviceState`) with per-key locking
//! - Provide the **control services** (`LedService`, `FeatureService`,
//!   `SoundService`, `PhotoService`) and the `MotionOrchestrator`
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `pumpkinpi-domain` only (plus `tokio` for channels, timers and
//! task spawning). Never imports adapter crates.

pub mod device_state;
pub mod event_bus;
pub mod motion;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
