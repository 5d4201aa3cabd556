// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod client;
pub mod common;
pub mod driver;

#[cfg(test)]
mod mock;

// Re-export key types for convenience
pub use common::{DriverConfig, Hcsr04Error, PulseWidth, SensorState};
pub use driver::{Hcsr04, Hcsr04Module, Session};
