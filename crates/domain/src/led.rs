//! LED — a binary output whose status mirrors a GPIO pin.

use serde::{Deserialize, Serialize};

/// On/off status of an LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedStatus {
    On,
    #[default]
    Off,
}

impl LedStatus {
    /// Normalise a requested status.
    ///
    /// `"on"` in any letter case maps to [`On`](Self::On); every other
    /// input, including garbage, maps to [`Off`](Self::Off).
    #[must_use]
    pub fn normalize(requested: &str) -> Self {
        if requested.eq_ignore_ascii_case("on") {
            Self::On
        } else {
            Self::Off
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for LedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// A status LED as seen by clients and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: LedStatus,
}

impl Led {
    /// Create an LED in the `off` state. The id is stored lowercase.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: crate::id::catalog_key(&id.into()),
            name: name.into(),
            status: LedStatus::Off,
        }
    }
}
