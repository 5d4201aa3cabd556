// src/driver/session.rs

use super::engine::MeasurementEngine;
use super::gate::{ExclusivityGate, GateGuard};
use super::store::ResultStore;
use crate::common::{
    config::{DriverConfig, StaleReadPolicy},
    hal_traits::MonotonicClock,
    EdgeTimestamps, Hcsr04Error, PulseWidth, SensorState,
};
use embedded_hal::digital::{InputPin, OutputPin};

/// Everything a session gets exclusive access to.
struct Sensor<TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    engine: MeasurementEngine<TRIG, ECHO, CLK>,
    store: ResultStore,
}

/// Device context for one HC-SR04.
///
/// Owns the pins, the clock and the last result. Callers reach it through
/// [`Hcsr04::open`], which admits one [`Session`] at a time.
pub struct Hcsr04<TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    sensor: ExclusivityGate<Sensor<TRIG, ECHO, CLK>>,
    stale_read: StaleReadPolicy,
}

impl<TRIG, ECHO, CLK> Hcsr04<TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLK, config: &DriverConfig) -> Self {
        Hcsr04 {
            sensor: ExclusivityGate::new(Sensor {
                engine: MeasurementEngine::new(trigger, echo, clock, config),
                store: ResultStore::new(),
            }),
            stale_read: config.stale_read,
        }
    }

    /// Starts a session. Fails with `DeviceBusy` while another one is open.
    pub fn open(&self) -> Result<Session<'_, TRIG, ECHO, CLK>, Hcsr04Error> {
        let sensor = self.sensor.acquire().inspect_err(|_| {
            log::debug!("hcsr04: open rejected, device busy");
        })?;
        log::debug!("hcsr04: session opened");
        Ok(Session { sensor, stale_read: self.stale_read })
    }

    pub fn is_open(&self) -> bool {
        self.sensor.is_held()
    }

    /// Last stored width, bypassing the session machinery.
    pub fn last_pulse_width(&mut self) -> Option<PulseWidth> {
        self.sensor.get_mut().store.fetch()
    }

    /// Hands the hardware back.
    pub fn release(self) -> (TRIG, ECHO, CLK) {
        self.sensor.into_inner().engine.into_parts()
    }
}

/// An open handle on the sensor. Closing (or dropping) it frees the device.
///
/// `read` and `write` borrow the session mutably, so one session cannot have
/// a read racing an in-flight measurement.
pub struct Session<'a, TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    sensor: GateGuard<'a, Sensor<TRIG, ECHO, CLK>>,
    stale_read: StaleReadPolicy,
}

impl<TRIG, ECHO, CLK> Session<'_, TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    /// Triggers a measurement. The payload is ignored; an empty one does
    /// nothing. Returns the number of bytes accepted.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, Hcsr04Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.measure()?;
        Ok(buf.len())
    }

    /// Copies the stored pulse width into `buf` as a host order `i32`.
    /// Never triggers and never blocks.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Hcsr04Error> {
        let got = buf.len();
        let out = buf
            .get_mut(..PulseWidth::WIRE_SIZE)
            .ok_or(Hcsr04Error::BufferTooSmall { needed: PulseWidth::WIRE_SIZE, got })?;

        let width = match (self.sensor.store.fetch(), self.stale_read) {
            (Some(width), _) => width,
            (None, StaleReadPolicy::Zeroed) => PulseWidth::ZERO,
            (None, StaleReadPolicy::Reject) => return Err(Hcsr04Error::NoMeasurement),
        };
        out.copy_from_slice(&width.to_ne_bytes());
        Ok(PulseWidth::WIRE_SIZE)
    }

    /// Typed form of `write`: runs one cycle and stores the result.
    pub fn measure(&mut self) -> Result<PulseWidth, Hcsr04Error> {
        let width = self.sensor.engine.trigger()?;
        self.sensor.store.record(width);
        Ok(width)
    }

    /// Typed form of `read`.
    pub fn last(&self) -> Option<PulseWidth> {
        self.sensor.store.fetch()
    }

    pub fn state(&self) -> SensorState {
        self.sensor.engine.state()
    }

    pub fn edges(&self) -> Option<EdgeTimestamps<CLK::Instant>> {
        self.sensor.engine.edges()
    }

    pub fn close(self) {}
}

impl<TRIG, ECHO, CLK> Drop for Session<'_, TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    fn drop(&mut self) {
        // Gate reopens when `sensor` drops right after this
        self.sensor.engine.reset();
        log::debug!("hcsr04: session closed");
    }
}

#[cfg(feature = "std")]
impl From<Hcsr04Error> for std::io::Error {
    fn from(e: Hcsr04Error) -> Self {
        use std::io::ErrorKind;
        let kind = match e {
            Hcsr04Error::DeviceBusy => ErrorKind::WouldBlock,
            Hcsr04Error::MeasurementTimeout { .. } => ErrorKind::TimedOut,
            Hcsr04Error::NoMeasurement => ErrorKind::Other,
            Hcsr04Error::BufferTooSmall { .. } => ErrorKind::InvalidInput,
            Hcsr04Error::Pin(_) => ErrorKind::Other,
        };
        std::io::Error::new(kind, e)
    }
}

#[cfg(feature = "std")]
impl<TRIG, ECHO, CLK> std::io::Read for Session<'_, TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(Session::read(self, buf)?)
    }
}

#[cfg(feature = "std")]
impl<TRIG, ECHO, CLK> std::io::Write for Session<'_, TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(Session::write(self, buf)?)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
