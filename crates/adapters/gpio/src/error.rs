//! GPIO adapter error types.

use pumpkinpi_domain::error::{DeviceError, PumpkinError};

/// Errors specific to the GPIO adapter.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// Writing the pin number to `export` failed.
    #[error("unable to export GPIO {pin}")]
    Export {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// Setting the pin direction failed.
    #[error("unable to configure GPIO {pin}")]
    Configure {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// Writing the pin value failed.
    #[error("unable to write GPIO {pin}")]
    Write {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// The pin was opened as an output and cannot be watched.
    #[error("GPIO {pin} is not an input")]
    NotAnInput { pin: u32 },
}

impl GpioError {
    /// Convert into a [`DeviceError::Actuator`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> PumpkinError {
        DeviceError::Actuator(Box::new(self)).into()
    }
}

impl From<GpioError> for PumpkinError {
    fn from(err: GpioError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn should_convert_to_generic_actuator_error() {
        let err = GpioError::Write {
            pin: 17,
            source: std::io::Error::other("EBUSY"),
        };
        let domain = err.into_domain();
        assert!(matches!(domain, PumpkinError::Device(DeviceError::Actuator(_))));
        assert_eq!(domain.to_string(), "unable to drive actuator");
    }

    #[test]
    fn should_keep_pin_and_cause_in_source_chain() {
        let domain: PumpkinError = GpioError::Configure {
            pin: 4,
            source: std::io::Error::other("permission denied"),
        }
        .into();
        let PumpkinError::Device(device) = domain else {
            panic!("expected a device error");
        };
        let gpio = device.source().unwrap();
        assert_eq!(gpio.to_string(), "unable to configure GPIO 4");
        assert_eq!(gpio.source().unwrap().to_string(), "permission denied");
    }
}
