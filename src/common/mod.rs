// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod poll;
pub mod state;
pub mod timing;

#[cfg(feature = "std")]
pub mod std_clock;

// --- Re-export key types/traits/functions for easier access ---

// From config.rs
pub use config::{DriverConfig, StaleReadPolicy};

// From error.rs
pub use error::{Hcsr04Error, InitError, PinRequestError};

// From hal_traits.rs
pub use hal_traits::{ClockInstant, DeviceNumber, DeviceRegistry, MonotonicClock, PinControl};

// From poll.rs
pub use poll::{poll_until, PollOutcome};

// From state.rs
pub use state::{Edge, EdgeTimestamps, PulseWidth, SensorState};

#[cfg(feature = "std")]
pub use std_clock::StdClock;
