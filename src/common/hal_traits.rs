// src/common/hal_traits.rs

use core::fmt::{self, Debug};
use core::ops::{Add, Sub};
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use super::error::PinRequestError;

/// A point on a monotonic timeline.
///
/// Blanket-implemented, so `std::time::Instant` and simple tick counters
/// qualify as long as subtraction yields a `Duration`.
pub trait ClockInstant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> ClockInstant for T where T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration> {}

/// Monotonic time source readable with microsecond resolution.
///
/// The `DelayNs` supertrait supplies the busy delays used for the trigger
/// pulse. Implementations must spin rather than sleep: scheduler sleeps are
/// far coarser than the 10 us pulse.
pub trait MonotonicClock: DelayNs {
    type Instant: ClockInstant;

    /// Current time. Must never go backwards.
    fn now(&mut self) -> Self::Instant;
}

/// Pin-control subsystem consumed at module initialization.
///
/// Hands out the trigger line as a push-pull output and the echo line as an
/// input, addressed by resolved line number.
pub trait PinControl {
    /// Subsystem specific cause of a configuration failure.
    type Error: Debug;
    type Output: OutputPin;
    type Input: InputPin;

    /// Claims `gpio` and drives it to `initial` as an output.
    fn request_output(
        &mut self,
        gpio: u32,
        initial: PinState,
    ) -> Result<Self::Output, PinRequestError<Self::Error>>;

    /// Claims `gpio` as an input.
    fn request_input(&mut self, gpio: u32) -> Result<Self::Input, PinRequestError<Self::Error>>;

    /// Gives an output pin back. Never fails.
    fn release_output(&mut self, pin: Self::Output);

    /// Gives an input pin back. Never fails.
    fn release_input(&mut self, pin: Self::Input);
}

/// Number identifying a registered device.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl DeviceNumber {
    pub const fn new(major: u32, minor: u32) -> Self {
        DeviceNumber { major, minor }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Device-registration subsystem consumed at module initialization.
pub trait DeviceRegistry {
    type Error: Debug;

    /// Allocates a unique device number and publishes the device under `name`.
    fn register(&mut self, name: &str) -> Result<DeviceNumber, Self::Error>;

    /// Withdraws the device and frees its number.
    fn unregister(&mut self, number: DeviceNumber, name: &str);
}
