//! Feature — a user-facing switch backed by a device-state toggle.
//!
//! Only two features carry state today: `motion-sensor` uses `enabled`,
//! `webcam` uses `brightness`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;

/// Id of the motion-sensor feature.
pub const MOTION_SENSOR: &str = "motion-sensor";
/// Id of the webcam feature.
pub const WEBCAM: &str = "webcam";

/// Literal token selecting alternating 0 %/100 % capture brightness.
pub const AUTO_TOGGLE: &str = "auto-toggle";

/// Webcam brightness mode.
///
/// Serialises as the string `"auto-toggle"` or a bare integer in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BrightnessRepr", into = "BrightnessRepr")]
pub enum Brightness {
    AutoToggle,
    Level(u8),
}

impl Brightness {
    pub const MAX: u8 = 100;
}

impl FromStr for Brightness {
    type Err = InvalidInputError;

    /// Accept `auto-toggle` or an integer in `0..=100`.
    ///
    /// Non-numeric and out-of-range values are rejected rather than clamped.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value == AUTO_TOGGLE {
            return Ok(Self::AutoToggle);
        }
        match value.parse::<i64>() {
            Ok(level) if (0..=i64::from(Self::MAX)).contains(&level) => {
                Ok(Self::Level(u8::try_from(level).unwrap_or(Self::MAX)))
            }
            _ => Err(InvalidInputError::Brightness(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Brightness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AutoToggle => f.write_str(AUTO_TOGGLE),
            Self::Level(level) => write!(f, "{level}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BrightnessRepr {
    Level(i64),
    Token(String),
}

impl TryFrom<BrightnessRepr> for Brightness {
    type Error = InvalidInputError;

    fn try_from(repr: BrightnessRepr) -> Result<Self, Self::Error> {
        match repr {
            BrightnessRepr::Level(level) => level.to_string().parse(),
            BrightnessRepr::Token(token) => token.parse(),
        }
    }
}

impl From<Brightness> for BrightnessRepr {
    fn from(brightness: Brightness) -> Self {
        match brightness {
            Brightness::AutoToggle => Self::Token(AUTO_TOGGLE.to_string()),
            Brightness::Level(level) => Self::Level(i64::from(level)),
        }
    }
}

/// A feature as seen by clients and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Brightness>,
}

impl Feature {
    /// A feature that is switched on and off.
    #[must_use]
    pub fn switch(id: impl Into<String>, name: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: crate::id::catalog_key(&id.into()),
            name: name.into(),
            enabled: Some(enabled),
            brightness: None,
        }
    }

    /// A feature that carries a brightness mode.
    #[must_use]
    pub fn dimmable(id: impl Into<String>, name: impl Into<String>, brightness: Brightness) -> Self {
        Self {
            id: crate::id::catalog_key(&id.into()),
            name: name.into(),
            enabled: None,
            brightness: Some(brightness),
        }
    }

    /// Device-state key mirroring `enabled` (e.g. `motion-sensor-enabled`).
    #[must_use]
    pub fn enabled_key(&self) -> String {
        enabled_key(&self.id)
    }

    /// Device-state key mirroring `brightness` (e.g. `webcam-brightness`).
    #[must_use]
    pub fn brightness_key(&self) -> String {
        brightness_key(&self.id)
    }
}

#[must_use]
pub fn enabled_key(feature_id: &str) -> String {
    format!("{feature_id}-enabled")
}

#[must_use]
pub fn brightness_key(feature_id: &str) -> String {
    format!("{feature_id}-brightness")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_auto_toggle_token() {
        assert_eq!("auto-toggle".parse(), Ok(Brightness::AutoToggle));
    }

    #[test]
    fn should_parse_integer_levels_in_range() {
        assert_eq!("0".parse(), Ok(Brightness::Level(0)));
        assert_eq!("42".parse(), Ok(Brightness::Level(42)));
        assert_eq!(" 100 ".parse(), Ok(Brightness::Level(100)));
    }

    #[test]
    fn should_reject_out_of_range_levels() {
        assert_eq!(
            "150".parse::<Brightness>(),
            Err(InvalidInputError::Brightness("150".to_string()))
        );
        assert!("-1".parse::<Brightness>().is_err());
    }

    #[test]
    fn should_reject_non_numeric_values() {
        for raw in ["", "bright", "50%", "12.5", "Auto-Toggle"] {
            assert!(raw.parse::<Brightness>().is_err(), "{raw:?}");
        }
    }

    #[test]
    fn should_serialize_brightness_as_token_or_number() {
        assert_eq!(
            serde_json::to_value(Brightness::AutoToggle).unwrap(),
            serde_json::json!("auto-toggle")
        );
        assert_eq!(
            serde_json::to_value(Brightness::Level(30)).unwrap(),
            serde_json::json!(30)
        );
    }

    #[test]
    fn should_deserialize_numeric_string_and_number() {
        let a: Brightness = serde_json::from_value(serde_json::json!("75")).unwrap();
        let b: Brightness = serde_json::from_value(serde_json::json!(75)).unwrap();
        assert_eq!(a, Brightness::Level(75));
        assert_eq!(b, Brightness::Level(75));
    }

    #[test]
    fn should_fail_deserializing_out_of_range_number() {
        let result: Result<Brightness, _> = serde_json::from_value(serde_json::json!(101));
        assert!(result.is_err());
    }

    #[test]
    fn should_derive_device_state_keys_from_id() {
        let motion = Feature::switch(MOTION_SENSOR, "Motion sensor", false);
        let webcam = Feature::dimmable(WEBCAM, "Webcam", Brightness::AutoToggle);
        assert_eq!(motion.enabled_key(), "motion-sensor-enabled");
        assert_eq!(webcam.brightness_key(), "webcam-brightness");
    }

    #[test]
    fn should_skip_absent_fields_when_serializing() {
        let motion = Feature::switch(MOTION_SENSOR, "Motion sensor", true);
        let json = serde_json::to_value(&motion).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "motion-sensor", "name": "Motion sensor", "enabled": true})
        );
    }
}
