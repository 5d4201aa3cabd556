// src/driver/module.rs

use super::session::Hcsr04;
use crate::common::{
    config::DriverConfig,
    hal_traits::{DeviceNumber, DeviceRegistry, MonotonicClock, PinControl},
    InitError,
};
use embedded_hal::digital::PinState;

/// A loaded driver instance: registered device number plus the sensor it
/// serves.
///
/// Bring-up and teardown go through the pin-control and device-registration
/// subsystems, which are borrowed only for those two calls.
pub struct Hcsr04Module<P, CLK>
where
    P: PinControl,
    CLK: MonotonicClock,
{
    device: Hcsr04<P::Output, P::Input, CLK>,
    number: DeviceNumber,
    config: DriverConfig,
}

impl<P, CLK> Hcsr04Module<P, CLK>
where
    P: PinControl,
    CLK: MonotonicClock,
{
    /// Registers the device and claims its pins.
    ///
    /// Registration comes first; if it fails nothing else is attempted. A pin
    /// failure gives back whatever was already claimed, including the device
    /// number, so a failed init leaves no trace.
    pub fn init<R>(
        config: DriverConfig,
        pins: &mut P,
        registry: &mut R,
        clock: CLK,
    ) -> Result<Self, InitError<R::Error, P::Error>>
    where
        R: DeviceRegistry,
    {
        let name = config.device_name;
        let (trigger_gpio, echo_gpio) = config.validate::<R::Error, P::Error>().inspect_err(|e| {
            log::error!("{} - Invalid configuration: {}", name, e);
        })?;

        let number = registry.register(name).map_err(|e| {
            log::error!("{} - Failed to register character device: {:?}", name, e);
            InitError::Registration(e)
        })?;

        let trigger = match pins.request_output(trigger_gpio, PinState::Low) {
            Ok(pin) => pin,
            Err(e) => {
                log::error!("{} - Error requesting trigger pin: {}", name, e);
                registry.unregister(number, name);
                return Err(e.into());
            }
        };

        let echo = match pins.request_input(echo_gpio) {
            Ok(pin) => pin,
            Err(e) => {
                log::error!("{} - Error requesting echo pin: {}", name, e);
                pins.release_output(trigger);
                registry.unregister(number, name);
                return Err(e.into());
            }
        };

        log::info!(
            "{} - Registered character device with major number {} (trigger {}, echo {})",
            name,
            number.major,
            trigger_gpio,
            echo_gpio
        );

        Ok(Hcsr04Module {
            device: Hcsr04::new(trigger, echo, clock, &config),
            number,
            config,
        })
    }

    #[inline]
    pub fn device(&self) -> &Hcsr04<P::Output, P::Input, CLK> {
        &self.device
    }

    #[inline]
    pub fn device_number(&self) -> DeviceNumber {
        self.number
    }

    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Unloads the module: pins go back to the pin controller and the device
    /// number is freed. Returns the clock.
    pub fn exit<R>(self, pins: &mut P, registry: &mut R) -> CLK
    where
        R: DeviceRegistry,
    {
        let name = self.config.device_name;
        let (trigger, echo, clock) = self.device.release();
        pins.release_input(echo);
        pins.release_output(trigger);
        registry.unregister(self.number, name);
        log::info!("{} - Unregistered character device {}", name, self.number);
        clock
    }
}
