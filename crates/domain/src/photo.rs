//! Photo — a JPEG in the photos directory, derived on demand.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;
use crate::time::{Timestamp, file_stamp};

/// URL prefix under which photo files are served.
pub const URL_PREFIX: &str = "/photos/";

const EXTENSION: &str = ".jpg";

/// A captured photo: its file name and the URL it is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub path: String,
}

impl Photo {
    #[must_use]
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let id = filename.into();
        let path = format!("{URL_PREFIX}{id}");
        Self { id, path }
    }

    /// File name for a capture taken at `ts`.
    #[must_use]
    pub fn capture_filename(ts: Timestamp) -> String {
        format!("{}{EXTENSION}", file_stamp(ts))
    }

    /// Whether a directory entry name looks like a photo.
    #[must_use]
    pub fn is_photo_filename(name: &str) -> bool {
        name.ends_with(EXTENSION)
    }

    /// Reject ids that would escape the photos directory.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::PhotoId`] for empty ids, ids containing
    /// a path separator, or `.`/`..`.
    pub fn validate_id(id: &str) -> Result<(), InvalidInputError> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(InvalidInputError::PhotoId);
        }
        Ok(())
    }
}

/// Ordering of a photo listing by modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl FromStr for SortOrder {
    type Err = InvalidInputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(InvalidInputError::SortOrder(other.to_string())),
        }
    }
}
