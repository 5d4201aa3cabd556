// src/common/timing.rs

use core::time::Duration;

// Nominal HC-SR04 timings. All of these are defaults, see `DriverConfig`.

// === Trigger ===

/// High time of the trigger pulse that starts a ranging cycle.
pub const TRIGGER_PULSE: Duration = Duration::from_micros(10);

// === Echo ===

/// Ceiling for each of the two echo edge waits.
pub const EDGE_TIMEOUT: Duration = Duration::from_millis(20);
/// Worst case time a single `write` keeps the caller spinning.
pub const MAX_TRIGGER_DURATION: Duration = Duration::from_millis(40);
/// Delay between echo samples. Zero means a pure spin.
pub const POLL_TICK: Duration = Duration::ZERO;

// === Conversion (caller side) ===

/// Microseconds of echo per centimetre of distance, from the speed of sound
/// (round trip, ~343 m/s).
pub const US_PER_CM: f32 = 58.0;
