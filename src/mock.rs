// src/mock.rs
//
// Test doubles shared by the unit tests. Time is a shared counter: every
// `now()` sample advances it by 1 us and delays advance it by their length,
// so a polling loop sees consecutive microseconds.

use crate::common::{
    hal_traits::{DeviceNumber, DeviceRegistry, MonotonicClock, PinControl},
    PinRequestError,
};
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, PinState};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Clock ---
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    time_us: Arc<AtomicU64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.time_us.load(Ordering::SeqCst)
    }

    pub fn advance(&self, us: u64) {
        self.time_us.fetch_add(us, Ordering::SeqCst);
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns).div_ceil(1_000));
    }
}

impl MonotonicClock for MockClock {
    type Instant = MockInstant;

    fn now(&mut self) -> MockInstant {
        MockInstant(self.time_us.fetch_add(1, Ordering::SeqCst))
    }
}

// --- Mock Pin Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// --- Trigger pin ---
#[derive(Debug, Default)]
struct TriggerLog {
    // (level, time) for every set call
    events: Vec<(bool, u64)>,
    released_at: Option<u64>,
    fail: bool,
}

#[derive(Debug, Clone)]
pub struct MockTrigger {
    gpio: u32,
    clock: MockClock,
    log: Arc<Mutex<TriggerLog>>,
}

impl MockTrigger {
    pub fn new(gpio: u32, clock: &MockClock) -> Self {
        MockTrigger { gpio, clock: clock.clone(), log: Arc::default() }
    }

    pub fn gpio(&self) -> u32 {
        self.gpio
    }

    pub fn events(&self) -> Vec<(bool, u64)> {
        self.log.lock().unwrap().events.clone()
    }

    /// Time the last trigger pulse ended.
    pub fn released_at(&self) -> Option<u64> {
        self.log.lock().unwrap().released_at
    }

    pub fn set_failing(&self, fail: bool) {
        self.log.lock().unwrap().fail = fail;
    }

    fn set(&mut self, high: bool) -> Result<(), MockPinError> {
        let now = self.clock.current();
        let mut log = self.log.lock().unwrap();
        if log.fail {
            return Err(MockPinError);
        }
        log.events.push((high, now));
        if !high {
            log.released_at = Some(now);
        }
        Ok(())
    }
}

impl ErrorType for MockTrigger {
    type Error = MockPinError;
}

impl OutputPin for MockTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

// --- Echo pin ---

/// Echo line behaviour, times relative to the end of the trigger pulse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EchoScript {
    Pulse { rise_at: u64, fall_at: u64 },
    NeverRises,
    Faulty,
}

impl EchoScript {
    pub fn stuck_high(rise_at: u64) -> Self {
        EchoScript::Pulse { rise_at, fall_at: u64::MAX / 2 }
    }
}

#[derive(Debug, Clone)]
pub struct MockEcho {
    gpio: u32,
    clock: MockClock,
    trigger: MockTrigger,
    script: Arc<Mutex<EchoScript>>,
}

impl MockEcho {
    pub fn new(gpio: u32, clock: &MockClock, trigger: &MockTrigger) -> Self {
        MockEcho {
            gpio,
            clock: clock.clone(),
            trigger: trigger.clone(),
            script: Arc::new(Mutex::new(EchoScript::NeverRises)),
        }
    }

    pub fn gpio(&self) -> u32 {
        self.gpio
    }

    pub fn script(&self, script: EchoScript) {
        *self.script.lock().unwrap() = script;
    }

    fn level(&self) -> Result<bool, MockPinError> {
        let script = *self.script.lock().unwrap();
        let Some(base) = self.trigger.released_at() else {
            return Ok(false);
        };
        let now = self.clock.current();
        match script {
            EchoScript::Pulse { rise_at, fall_at } => {
                Ok(now >= base + rise_at && now < base.saturating_add(fall_at))
            }
            EchoScript::NeverRises => Ok(false),
            EchoScript::Faulty => Err(MockPinError),
        }
    }
}

impl ErrorType for MockEcho {
    type Error = MockPinError;
}

impl InputPin for MockEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|high| !high)
    }
}

/// Clock plus a wired trigger/echo pair.
pub fn rig() -> (MockClock, MockTrigger, MockEcho) {
    let clock = MockClock::new();
    let trigger = MockTrigger::new(535, &clock);
    let echo = MockEcho::new(536, &clock, &trigger);
    (clock, trigger, echo)
}

// --- Pin controller ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockControlError;

#[derive(Debug)]
pub struct MockPinControl {
    pub clock: MockClock,
    pub trigger: MockTrigger,
    pub echo: MockEcho,
    /// Lines that do not exist.
    pub missing: Vec<u32>,
    /// Lines that exist but refuse configuration.
    pub unconfigurable: Vec<u32>,
    pub outstanding: Arc<AtomicUsize>,
    pub initial_level: Option<PinState>,
}

impl MockPinControl {
    pub fn new() -> Self {
        let (clock, trigger, echo) = rig();
        MockPinControl {
            clock,
            trigger,
            echo,
            missing: Vec::new(),
            unconfigurable: Vec::new(),
            outstanding: Arc::default(),
            initial_level: None,
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    fn check(&self, gpio: u32) -> Result<(), PinRequestError<MockControlError>> {
        if self.missing.contains(&gpio) {
            return Err(PinRequestError::NoSuchPin(gpio));
        }
        if self.unconfigurable.contains(&gpio) {
            return Err(PinRequestError::Configuration { gpio, error: MockControlError });
        }
        Ok(())
    }
}

impl PinControl for MockPinControl {
    type Error = MockControlError;
    type Output = MockTrigger;
    type Input = MockEcho;

    fn request_output(
        &mut self,
        gpio: u32,
        initial: PinState,
    ) -> Result<MockTrigger, PinRequestError<MockControlError>> {
        self.check(gpio)?;
        self.initial_level = Some(initial);
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(MockTrigger { gpio, ..self.trigger.clone() })
    }

    fn request_input(&mut self, gpio: u32) -> Result<MockEcho, PinRequestError<MockControlError>> {
        self.check(gpio)?;
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(MockEcho { gpio, ..self.echo.clone() })
    }

    fn release_output(&mut self, _pin: MockTrigger) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    fn release_input(&mut self, _pin: MockEcho) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

// --- Device registry ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockRegistryError;

#[derive(Debug, Default)]
pub struct MockRegistry {
    pub fail: bool,
    pub next_major: u32,
    pub registered: Vec<(DeviceNumber, String)>,
}

impl MockRegistry {
    pub fn new() -> Self {
        MockRegistry { next_major: 240, ..Default::default() }
    }
}

impl DeviceRegistry for MockRegistry {
    type Error = MockRegistryError;

    fn register(&mut self, name: &str) -> Result<DeviceNumber, MockRegistryError> {
        if self.fail {
            return Err(MockRegistryError);
        }
        let number = DeviceNumber::new(self.next_major, 0);
        self.next_major += 1;
        self.registered.push((number, name.into()));
        Ok(number)
    }

    fn unregister(&mut self, number: DeviceNumber, name: &str) {
        self.registered.retain(|(n, s)| !(*n == number && s == name));
    }
}
