//! # pumpkinpi-adapter-host
//!
//! Host operating system adapters:
//!
//! - [`SystemCommandRunner`] — `CommandRunner` on `tokio::process`, used for
//!   the audio player (`aplay`) and the capture tool (`fswebcam`)
//! - [`HostFileSystem`] — `FileSystem` on `tokio::fs`, used for photo
//!   listings and capture reconciliation
//!
//! ## Dependency rule
//!
//! Depends on `pumpkinpi-app` (port traits) and `pumpkinpi-domain` only.

mod command;
mod error;
mod file_system;

pub use command::SystemCommandRunner;
pub use error::HostError;
pub use file_system::HostFileSystem;
