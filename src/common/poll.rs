// src/common/poll.rs

use super::hal_traits::MonotonicClock;
use core::time::Duration;
use nb::Result as NbResult;

/// How a bounded poll ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PollOutcome<T, I> {
    /// The predicate succeeded. `at` is sampled right after the successful check.
    EdgeDetected { value: T, at: I },
    /// The ceiling elapsed first.
    TimedOut,
}

impl<T, I> PollOutcome<T, I> {
    #[inline]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollOutcome::TimedOut)
    }
}

/// Repeatedly evaluates `predicate` until it stops returning `WouldBlock`,
/// or until more than `ceiling` has passed since `since`.
///
/// The calling thread is never descheduled: with a zero `tick_hint` the loop
/// spins, otherwise it busy-delays `tick_hint` between samples. A predicate
/// error (`nb::Error::Other`) ends the poll immediately.
pub fn poll_until<C, T, E, F>(
    clock: &mut C,
    since: C::Instant,
    ceiling: Duration,
    tick_hint: Duration,
    mut predicate: F,
) -> Result<PollOutcome<T, C::Instant>, E>
where
    C: MonotonicClock,
    F: FnMut() -> NbResult<T, E>,
{
    let deadline = since + ceiling;
    let tick_ns = u32::try_from(tick_hint.as_nanos()).unwrap_or(u32::MAX);

    loop {
        match predicate() {
            Ok(value) => {
                let at = clock.now();
                return Ok(PollOutcome::EdgeDetected { value, at });
            }
            Err(nb::Error::WouldBlock) => {
                if clock.now() > deadline {
                    return Ok(PollOutcome::TimedOut);
                }
                if tick_ns == 0 {
                    core::hint::spin_loop();
                } else {
                    clock.delay_ns(tick_ns);
                }
            }
            Err(nb::Error::Other(e)) => return Err(e),
        }
    }
}
