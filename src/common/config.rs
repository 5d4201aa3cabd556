// src/common/config.rs

use super::error::InitError;
use super::timing;
use core::fmt::Debug;
use core::time::Duration;

/// What `read` does when no measurement has completed yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum StaleReadPolicy {
    /// Fail with `Hcsr04Error::NoMeasurement`.
    #[default]
    Reject,
    /// Copy out a zero width, as older clients expect.
    Zeroed,
}

/// Initialization-time settings for one sensor.
///
/// Pins are given relative to `gpio_offset`; the line numbers handed to the
/// pin controller are `gpio_offset + pin`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DriverConfig {
    /// Name the device is registered under.
    pub device_name: &'static str,
    /// Base of the GPIO chip the pins live on.
    pub gpio_offset: u32,
    pub trigger_pin: u32,
    pub echo_pin: u32,
    pub trigger_pulse: Duration,
    /// Applied separately to the rising and the falling edge wait.
    pub edge_timeout: Duration,
    /// Delay between echo samples; `Duration::ZERO` spins.
    pub poll_tick: Duration,
    pub stale_read: StaleReadPolicy,
}

impl DriverConfig {
    pub const DEFAULT_DEVICE_NAME: &'static str = "hcsr04_dev";

    pub const DEFAULT: DriverConfig = DriverConfig {
        device_name: Self::DEFAULT_DEVICE_NAME,
        gpio_offset: 512,
        trigger_pin: 23,
        echo_pin: 24,
        trigger_pulse: timing::TRIGGER_PULSE,
        edge_timeout: timing::EDGE_TIMEOUT,
        poll_tick: timing::POLL_TICK,
        stale_read: StaleReadPolicy::Reject,
    };

    pub const fn with_device_name(mut self, name: &'static str) -> Self {
        self.device_name = name;
        self
    }

    pub const fn with_gpio_offset(mut self, offset: u32) -> Self {
        self.gpio_offset = offset;
        self
    }

    pub const fn with_pins(mut self, trigger_pin: u32, echo_pin: u32) -> Self {
        self.trigger_pin = trigger_pin;
        self.echo_pin = echo_pin;
        self
    }

    pub const fn with_trigger_pulse(mut self, pulse: Duration) -> Self {
        self.trigger_pulse = pulse;
        self
    }

    pub const fn with_edge_timeout(mut self, timeout: Duration) -> Self {
        self.edge_timeout = timeout;
        self
    }

    pub const fn with_poll_tick(mut self, tick: Duration) -> Self {
        self.poll_tick = tick;
        self
    }

    pub const fn with_stale_read(mut self, policy: StaleReadPolicy) -> Self {
        self.stale_read = policy;
        self
    }

    /// Line number of the trigger pin, `None` on overflow.
    pub const fn trigger_gpio(&self) -> Option<u32> {
        self.gpio_offset.checked_add(self.trigger_pin)
    }

    /// Line number of the echo pin, `None` on overflow.
    pub const fn echo_gpio(&self) -> Option<u32> {
        self.gpio_offset.checked_add(self.echo_pin)
    }

    /// Checks the settings for contradictions and returns the resolved
    /// `(trigger, echo)` line numbers.
    pub fn validate<R: Debug, P: Debug>(&self) -> Result<(u32, u32), InitError<R, P>> {
        if self.device_name.is_empty() {
            return Err(InitError::InvalidConfig("device name is empty"));
        }
        let trigger = self
            .trigger_gpio()
            .ok_or(InitError::InvalidConfig("trigger pin overflows the gpio offset"))?;
        let echo = self
            .echo_gpio()
            .ok_or(InitError::InvalidConfig("echo pin overflows the gpio offset"))?;
        if trigger == echo {
            return Err(InitError::InvalidConfig("trigger and echo share a pin"));
        }
        if self.trigger_pulse.is_zero() {
            return Err(InitError::InvalidConfig("trigger pulse is zero"));
        }
        if self.edge_timeout.is_zero() {
            return Err(InitError::InvalidConfig("edge timeout is zero"));
        }
        if self.poll_tick >= self.edge_timeout {
            return Err(InitError::InvalidConfig("poll tick exceeds the edge timeout"));
        }
        Ok((trigger, echo))
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
