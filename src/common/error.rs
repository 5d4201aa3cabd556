// src/common/error.rs

use super::state::Edge;
use core::fmt::Debug;
use embedded_hal::digital::ErrorKind;

/// Errors returned to the caller of a device operation.
///
/// None of these leave the sensor unusable: after any of them the next
/// `write` starts a fresh ranging cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Hcsr04Error {
    /// Another session currently holds the sensor.
    #[error("Device busy")]
    DeviceBusy,

    /// The echo line did not produce the expected edge within the edge timeout.
    #[error("Measurement timed out waiting for {edge:?} edge")]
    MeasurementTimeout { edge: Edge },

    /// `read` was called before any measurement completed and the driver is
    /// configured to reject such reads.
    #[error("No measurement available yet")]
    NoMeasurement,

    /// Caller supplied buffer cannot hold the pulse width.
    #[error("Buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    /// Driving or sampling a pin failed.
    #[error("Pin I/O error: {0:?}")]
    Pin(ErrorKind),
}

impl Hcsr04Error {
    /// `true` for errors the caller can simply retry.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Hcsr04Error::DeviceBusy | Hcsr04Error::MeasurementTimeout { .. })
    }
}

/// Failure to obtain a pin from the pin-control subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinRequestError<E>
where
    E: Debug,
{
    /// The line number does not resolve to a pin.
    #[error("No such pin: {0}")]
    NoSuchPin(u32),

    /// The pin exists but could not be claimed or put into the wanted direction.
    #[error("Failed to configure pin {gpio}: {error:?}")]
    Configuration { gpio: u32, error: E },
}

impl<E: Debug> PinRequestError<E> {
    /// Line number the failed request was for.
    pub fn gpio(&self) -> u32 {
        match self {
            PinRequestError::NoSuchPin(gpio) => *gpio,
            PinRequestError::Configuration { gpio, .. } => *gpio,
        }
    }
}

/// Fatal errors raised while bringing the module up. The module is not
/// loaded when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError<R = (), P = ()>
where
    R: Debug,
    P: Debug,
{
    /// The supplied configuration is self-contradictory.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The device-registration subsystem refused to hand out a device number.
    #[error("Device registration failed: {0:?}")]
    Registration(R),

    /// Pin acquisition or direction setup failed.
    #[error("Pin setup failed: {0}")]
    Pin(PinRequestError<P>),
}

impl<R: Debug, P: Debug> From<PinRequestError<P>> for InitError<R, P> {
    fn from(e: PinRequestError<P>) -> Self {
        InitError::Pin(e)
    }
}
