//! Event — a state change pushed to every connected observer.
//!
//! Each event carries the full canonical entity after the mutation, so an
//! observer can treat the last event per entity id as authoritative.

use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::id::EventId;
use crate::led::Led;
use crate::photo::Photo;
use crate::time::{Timestamp, now};

/// Broadcast topic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    LedUpdate,
    FeatureUpdate,
    PhotoUpdate,
}

impl Topic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LedUpdate => "led-update",
            Self::FeatureUpdate => "feature-update",
            Self::PhotoUpdate => "photo-update",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical entity carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "kebab-case")]
pub enum StateChange {
    LedUpdate(Led),
    FeatureUpdate(Feature),
    PhotoUpdate(Photo),
}

impl StateChange {
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Self::LedUpdate(_) => Topic::LedUpdate,
            Self::FeatureUpdate(_) => Topic::FeatureUpdate,
            Self::PhotoUpdate(_) => Topic::PhotoUpdate,
        }
    }

    /// Serialise only the entity, without the topic envelope.
    ///
    /// # Errors
    ///
    /// Returns a serde error if the entity cannot be encoded.
    pub fn payload_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::LedUpdate(led) => serde_json::to_string(led),
            Self::FeatureUpdate(feature) => serde_json::to_string(feature),
            Self::PhotoUpdate(photo) => serde_json::to_string(photo),
        }
    }
}

/// An immutable record of a published state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub change: StateChange,
    pub timestamp: Timestamp,
}

impl Event {
    #[must_use]
    pub fn new(change: StateChange) -> Self {
        Self {
            id: EventId::new(),
            change,
            timestamp: now(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.change.topic()
    }
}

impl From<StateChange> for Event {
    fn from(change: StateChange) -> Self {
        Self::new(change)
    }
}
