//! # pumpkinpi-adapter-gpio
//!
//! Actuator backends for LEDs and the motion sensor.
//!
//! | Backend | Used when | Behaviour |
//! |---------|-----------|-----------|
//! | [`SysfsPin`] | `/sys/class/gpio/export` is writable | Real GPIO lines |
//! | [`VirtualPin`] | No GPIO access (laptop, CI) | Remembers levels, synthesizes edges |
//!
//! Both implement `OutputPin` and `InputPin` from `pumpkinpi-app`;
//! [`GpioPin`] lets the daemon pick one at runtime.
//!
//! ## Dependency rule
//!
//! Depends on `pumpkinpi-app` (port traits) and `pumpkinpi-domain` only.

mod error;
mod sysfs;
mod virtual_pin;

pub use error::GpioError;
pub use sysfs::{SYSFS_ROOT, SysfsPin, WatchSettings, sysfs_available};
pub use virtual_pin::{DEFAULT_EDGE_INTERVAL, VirtualPin};

use tokio::sync::mpsc;

use pumpkinpi_app::ports::{Edge, InputPin, Level, OutputPin};
use pumpkinpi_domain::error::PumpkinError;

/// A pin from whichever backend was selected at startup.
pub enum GpioPin {
    Sysfs(SysfsPin),
    Virtual(VirtualPin),
}

impl GpioPin {
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }
}

impl OutputPin for GpioPin {
    fn write(&self, level: Level) -> Result<(), PumpkinError> {
        match self {
            Self::Sysfs(pin) => pin.write(level),
            Self::Virtual(pin) => pin.write(level),
        }
    }
}

impl InputPin for GpioPin {
    fn watch(&self) -> Result<mpsc::Receiver<Edge>, PumpkinError> {
        match self {
            Self::Sysfs(pin) => pin.watch(),
            Self::Virtual(pin) => pin.watch(),
        }
    }

    fn unwatch_all(&self) {
        match self {
            Self::Sysfs(pin) => pin.unwatch_all(),
            Self::Virtual(pin) => pin.unwatch_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_dispatch_writes_to_virtual_backend() {
        let pin = GpioPin::Virtual(VirtualPin::output("led1"));
        assert!(pin.is_virtual());
        pin.write(Level::High).unwrap();
        let GpioPin::Virtual(inner) = &pin else {
            panic!("expected a virtual pin");
        };
        assert_eq!(inner.level(), Level::High);
    }

    #[tokio::test]
    async fn should_dispatch_watch_to_virtual_backend() {
        let pin = GpioPin::Virtual(VirtualPin::input("motion", None, 2));
        let mut edges = pin.watch().unwrap();
        pin.unwatch_all();
        assert!(edges.recv().await.is_none());
    }
}
