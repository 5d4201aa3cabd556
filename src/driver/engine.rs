// src/driver/engine.rs

use crate::common::{
    config::DriverConfig,
    hal_traits::MonotonicClock,
    poll::{poll_until, PollOutcome},
    Edge, EdgeTimestamps, Hcsr04Error, PulseWidth, SensorState,
};
use core::time::Duration;
use embedded_hal::digital::{self, InputPin, OutputPin};

#[inline]
fn pin_error<E: digital::Error>(e: E) -> Hcsr04Error {
    Hcsr04Error::Pin(e.kind())
}

/// Drives one ranging cycle: trigger pulse, then two bounded busy-polls on
/// the echo line.
///
/// The engine is the only writer of `state` and `edges`.
pub struct MeasurementEngine<TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    trigger: TRIG,
    echo: ECHO,
    clock: CLK,
    state: SensorState,
    edges: Option<EdgeTimestamps<CLK::Instant>>,
    trigger_pulse: Duration,
    edge_timeout: Duration,
    poll_tick: Duration,
}

impl<TRIG, ECHO, CLK> MeasurementEngine<TRIG, ECHO, CLK>
where
    CLK: MonotonicClock,
{
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLK, config: &DriverConfig) -> Self {
        MeasurementEngine {
            trigger,
            echo,
            clock,
            state: SensorState::Idle,
            edges: None,
            trigger_pulse: config.trigger_pulse,
            edge_timeout: config.edge_timeout,
            poll_tick: config.poll_tick,
        }
    }

    #[inline]
    pub fn state(&self) -> SensorState {
        self.state
    }

    /// Edges of the last successful cycle, untouched by failed ones.
    #[inline]
    pub fn edges(&self) -> Option<EdgeTimestamps<CLK::Instant>> {
        self.edges
    }

    pub(crate) fn reset(&mut self) {
        self.state = SensorState::Idle;
    }

    pub(crate) fn into_parts(self) -> (TRIG, ECHO, CLK) {
        (self.trigger, self.echo, self.clock)
    }
}

impl<TRIG, ECHO, CLK> MeasurementEngine<TRIG, ECHO, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    CLK: MonotonicClock,
{
    /// Runs a full cycle and returns the echo pulse width.
    ///
    /// Spins for at most two edge timeouts. A `MeasurementTimeout` leaves the
    /// engine in `TimedOut`; pin faults drop it back to `Idle`. Either way the
    /// next call starts over.
    pub fn trigger(&mut self) -> Result<PulseWidth, Hcsr04Error> {
        self.state = SensorState::Triggered;

        match self.run_cycle() {
            Ok(width) => {
                log::debug!("hcsr04: echo pulse {}", width);
                Ok(width)
            }
            Err(e @ Hcsr04Error::MeasurementTimeout { edge }) => {
                log::warn!("hcsr04: no {:?} echo edge within {:?}", edge, self.edge_timeout);
                self.state = SensorState::TimedOut;
                Err(e)
            }
            Err(e) => {
                log::error!("hcsr04: measurement aborted: {}", e);
                self.state = SensorState::Idle;
                Err(e)
            }
        }
    }

    fn run_cycle(&mut self) -> Result<PulseWidth, Hcsr04Error> {
        self.fire_trigger_pulse()?;

        self.state = SensorState::AwaitingRisingEdge;
        let released = self.clock.now();
        let rising = self.wait_for_edge(Edge::Rising, released)?;

        self.state = SensorState::AwaitingFallingEdge;
        log::trace!("hcsr04: echo high");
        let falling = self.wait_for_edge(Edge::Falling, rising)?;

        let edges = EdgeTimestamps { rising, falling };
        self.edges = Some(edges);
        self.state = SensorState::Ready;
        Ok(edges.pulse_width())
    }

    fn fire_trigger_pulse(&mut self) -> Result<(), Hcsr04Error> {
        let pulse_ns = u32::try_from(self.trigger_pulse.as_nanos()).unwrap_or(u32::MAX);

        self.trigger.set_high().map_err(pin_error)?;
        self.clock.delay_ns(pulse_ns);
        self.trigger.set_low().map_err(pin_error)
    }

    /// Waits for `edge`, with the timeout counted from `since`.
    fn wait_for_edge(
        &mut self,
        edge: Edge,
        since: CLK::Instant,
    ) -> Result<CLK::Instant, Hcsr04Error> {
        let want_high = edge == Edge::Rising;
        let echo = &mut self.echo;

        let outcome = poll_until(&mut self.clock, since, self.edge_timeout, self.poll_tick, || {
            match echo.is_high() {
                Ok(level) if level == want_high => Ok(()),
                Ok(_) => Err(nb::Error::WouldBlock),
                Err(e) => Err(nb::Error::Other(pin_error(e))),
            }
        })?;

        match outcome {
            PollOutcome::EdgeDetected { at, .. } => Ok(at),
            PollOutcome::TimedOut => Err(Hcsr04Error::MeasurementTimeout { edge }),
        }
    }
}
