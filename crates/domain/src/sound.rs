//! Sound — a read-only catalog entry played through an external player.

use serde::{Deserialize, Serialize};

/// A playable sound. Playing it changes no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub id: String,
    pub title: String,
    /// File name relative to the sounds directory.
    pub file: String,
}

impl Sound {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: crate::id::catalog_key(&id.into()),
            title: title.into(),
            file: file.into(),
        }
    }
}
