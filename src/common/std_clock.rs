// src/common/std_clock.rs

use super::hal_traits::MonotonicClock;
use embedded_hal::delay::DelayNs;
use std::time::{Duration, Instant};

/// Clock backed by `std::time::Instant`.
///
/// Delays spin on the clock instead of calling `thread::sleep`, which cannot
/// hold a 10 us trigger pulse with any accuracy.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdClock;

impl StdClock {
    pub const fn new() -> Self {
        StdClock
    }
}

impl DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        let until = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < until {
            core::hint::spin_loop();
        }
    }
}

impl MonotonicClock for StdClock {
    type Instant = Instant;

    fn now(&mut self) -> Instant {
        Instant::now()
    }
}
