// src/driver/store.rs

use crate::common::PulseWidth;

/// Last pulse width produced by a completed ranging cycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ResultStore {
    last: Option<PulseWidth>,
}

impl ResultStore {
    pub const fn new() -> Self {
        ResultStore { last: None }
    }

    /// Overwrites whatever was stored.
    pub fn record(&mut self, width: PulseWidth) {
        self.last = Some(width);
    }

    /// `None` until the first successful cycle.
    pub fn fetch(&self) -> Option<PulseWidth> {
        self.last
    }
}
