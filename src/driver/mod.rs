// src/driver/mod.rs

// Stateful pieces of the driver, leaf first.
pub mod gate; // Single-session admission
pub mod store; // Last pulse width
pub mod engine; // Trigger + echo edge timing
pub mod session; // open/close/read/write surface
pub mod module; // Bring-up and teardown against the host subsystems

// --- Public Re-exports ---
pub use engine::MeasurementEngine;
pub use gate::{ExclusivityGate, GateGuard};
pub use module::Hcsr04Module;
pub use session::{Hcsr04, Session};
pub use store::ResultStore;
