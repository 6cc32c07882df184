//! Host adapter error types.

use std::path::PathBuf;

use pumpkinpi_domain::error::{DeviceError, PumpkinError};

/// Errors specific to the host adapter.
///
/// These carry program names and paths for the logs; the domain conversion
/// hides them behind a generic message.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The program could not be started.
    #[error("unable to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the program failed.
    #[error("unable to wait for {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem call failed.
    #[error("filesystem error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HostError {
    /// Convert into a [`PumpkinError::Device`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> PumpkinError {
        match self {
            Self::Spawn { .. } | Self::Wait { .. } => DeviceError::Command(Box::new(self)).into(),
            Self::Io { .. } => DeviceError::FileSystem(Box::new(self)).into(),
        }
    }
}

impl From<HostError> for PumpkinError {
    fn from(err: HostError) -> Self {
        err.into_domain()
    }
}
