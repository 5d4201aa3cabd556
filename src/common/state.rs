// src/common/state.rs

use core::fmt;
use core::time::Duration;

/// Where the sensor is in its ranging cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SensorState {
    /// No cycle in progress. Also the state after a session is closed.
    #[default]
    Idle,
    /// Trigger pulse is being driven.
    Triggered,
    /// Trigger pulse done, waiting for the echo line to go high.
    AwaitingRisingEdge,
    /// Echo line is high, waiting for it to drop.
    AwaitingFallingEdge,
    /// Both edges observed, pulse width stored.
    Ready,
    /// One of the edges did not arrive in time. The next write restarts the cycle.
    TimedOut,
}

impl SensorState {
    /// `true` while a trigger cycle is running.
    #[inline]
    pub const fn is_measuring(&self) -> bool {
        matches!(
            self,
            SensorState::Triggered | SensorState::AwaitingRisingEdge | SensorState::AwaitingFallingEdge
        )
    }
}

/// A transition on the echo line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edge {
    /// low -> high
    Rising,
    /// high -> low
    Falling,
}

/// Monotonic timestamps of the two echo edges from the last good cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EdgeTimestamps<I> {
    pub rising: I,
    pub falling: I,
}

impl<I> EdgeTimestamps<I>
where
    I: Copy + core::ops::Sub<I, Output = Duration>,
{
    /// Elapsed time between the edges.
    pub fn elapsed(&self) -> Duration {
        self.falling - self.rising
    }

    /// Pulse width in whole microseconds.
    pub fn pulse_width(&self) -> PulseWidth {
        PulseWidth::from_duration(self.elapsed())
    }
}

/// Time the echo line stayed high, in microseconds.
///
/// Surfaced to callers as a 4 byte signed integer in host byte order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct PulseWidth(i32);

impl PulseWidth {
    /// Number of bytes `read` copies out.
    pub const WIRE_SIZE: usize = core::mem::size_of::<i32>();

    pub const ZERO: PulseWidth = PulseWidth(0);

    #[inline]
    pub const fn from_micros(us: i32) -> Self {
        PulseWidth(us)
    }

    /// Saturates at `i32::MAX` for absurdly long durations.
    pub fn from_duration(d: Duration) -> Self {
        PulseWidth(i32::try_from(d.as_micros()).unwrap_or(i32::MAX))
    }

    #[inline]
    pub const fn as_micros(&self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn to_ne_bytes(self) -> [u8; Self::WIRE_SIZE] {
        self.0.to_ne_bytes()
    }

    #[inline]
    pub const fn from_ne_bytes(bytes: [u8; Self::WIRE_SIZE]) -> Self {
        PulseWidth(i32::from_ne_bytes(bytes))
    }
}

impl From<PulseWidth> for i32 {
    fn from(value: PulseWidth) -> Self {
        value.0
    }
}

impl fmt::Display for PulseWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}
