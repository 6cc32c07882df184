//! Catalog — the static set of LEDs, features, and sounds known at startup.
//!
//! Nothing is ever added to the catalog while the process runs; services
//! treat any id missing from it as not found.

use serde::{Deserialize, Serialize};

use crate::feature::{Brightness, Feature, MOTION_SENSOR, WEBCAM};
use crate::id::catalog_key;
use crate::led::Led;
use crate::sound::Sound;

/// Static lookup of every entity the controller knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub leds: Vec<Led>,
    pub features: Vec<Feature>,
    pub sounds: Vec<Sound>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            leds: vec![Led::new("led1", "Left eye"), Led::new("led2", "Right eye")],
            features: default_features(false, Brightness::AutoToggle),
            sounds: vec![
                Sound::new("evil-laugh.wav", "Evil laugh", "evil-laugh.wav"),
                Sound::new("ghost.wav", "Ghost", "ghost.wav"),
                Sound::new("scream.wav", "Scream", "scream.wav"),
                Sound::new("smile.wav", "Smile!", "smile.wav"),
            ],
        }
    }
}

impl Catalog {
    #[must_use]
    pub fn led(&self, id: &str) -> Option<&Led> {
        let key = catalog_key(id);
        self.leds.iter().find(|led| led.id == key)
    }

    #[must_use]
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        let key = catalog_key(id);
        self.features.iter().find(|feature| feature.id == key)
    }

    #[must_use]
    pub fn sound(&self, id: &str) -> Option<&Sound> {
        let key = catalog_key(id);
        self.sounds.iter().find(|sound| sound.id == key)
    }
}

/// The two stateful features with the given initial values.
#[must_use]
pub fn default_features(motion_enabled: bool, brightness: Brightness) -> Vec<Feature> {
    vec![
        Feature::switch(MOTION_SENSOR, "Motion sensor", motion_enabled),
        Feature::dimmable(WEBCAM, "Webcam", brightness),
    ]
}
