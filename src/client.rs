// src/client.rs
//
// Caller-side helpers. The driver only hands out pulse widths; turning them
// into distances is the client's business.

use crate::common::{hal_traits::MonotonicClock, timing, Hcsr04Error, PulseWidth};
use crate::driver::Hcsr04;
use embedded_hal::digital::{InputPin, OutputPin};

/// Distance to the target in centimetres for a given echo width.
pub fn distance_cm(width: PulseWidth) -> f32 {
    width.as_micros() as f32 / timing::US_PER_CM
}

/// One completed ranging.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    pub pulse_width: PulseWidth,
    pub distance_cm: f32,
}

impl From<PulseWidth> for Reading {
    fn from(pulse_width: PulseWidth) -> Self {
        Reading { pulse_width, distance_cm: distance_cm(pulse_width) }
    }
}

/// Opens the device, triggers with a one byte write, reads the 4 byte width
/// back and closes again.
pub fn measure_once<TRIG, ECHO, CLK>(device: &Hcsr04<TRIG, ECHO, CLK>) -> Result<Reading, Hcsr04Error>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    let mut session = device.open()?;
    session.write(&[1])?;

    let mut buf = [0u8; PulseWidth::WIRE_SIZE];
    session.read(&mut buf)?;
    session.close();

    Ok(PulseWidth::from_ne_bytes(buf).into())
}

/// Endless series of `measure_once` calls; use `take(n)` to bound it.
pub fn readings<TRIG, ECHO, CLK>(
    device: &Hcsr04<TRIG, ECHO, CLK>,
) -> impl Iterator<Item = Result<Reading, Hcsr04Error>> + '_
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    core::iter::repeat_with(move || measure_once(device))
}
