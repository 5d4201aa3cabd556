// src/driver/gate.rs

use crate::common::Hcsr04Error;
use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use portable_atomic::{AtomicBool, Ordering};

/// Single-admission guard around the sensor context.
///
/// `acquire` either takes the gate immediately or fails with `DeviceBusy`;
/// there is no queue and no waiting. The returned guard is the only path to
/// the wrapped value, so holding it means exclusive access.
pub struct ExclusivityGate<T> {
    held: AtomicBool,
    inner: UnsafeCell<T>,
}

// SAFETY: `inner` is only reachable through a `GateGuard`, and at most one
// guard exists at a time (enforced by the compare-exchange in `acquire`).
// That is the same contract as a mutex, so `T: Send` is sufficient.
unsafe impl<T: Send> Sync for ExclusivityGate<T> {}

impl<T> ExclusivityGate<T> {
    pub const fn new(inner: T) -> Self {
        ExclusivityGate {
            held: AtomicBool::new(false),
            inner: UnsafeCell::new(inner),
        }
    }

    /// Takes the gate, or fails with `DeviceBusy` if someone else holds it.
    pub fn acquire(&self) -> Result<GateGuard<'_, T>, Hcsr04Error> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| GateGuard { gate: self, _marker: PhantomData })
            .map_err(|_| Hcsr04Error::DeviceBusy)
    }

    /// Best-effort snapshot, may be stale by the time it is looked at.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }

    /// Direct access; `&mut self` already proves nobody holds a guard.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    fn release(&self) {
        self.held.store(false, Ordering::Release);
    }
}

/// Proof of admission. Dropping it reopens the gate, unconditionally.
pub struct GateGuard<'a, T> {
    gate: &'a ExclusivityGate<T>,
    // Gives the guard the Send/Sync behaviour of `&mut T`
    _marker: PhantomData<&'a mut T>,
}

impl<T> Deref for GateGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: this guard is the unique holder of the gate.
        unsafe { &*self.gate.inner.get() }
    }
}

impl<T> DerefMut for GateGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: this guard is the unique holder of the gate.
        unsafe { &mut *self.gate.inner.get() }
    }
}

impl<T> Drop for GateGuard<'_, T> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
