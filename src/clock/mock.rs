// src/clock/mock.rs

use std::cell::Cell;
use std::rc::Rc;

use super::Clock;

/// Hand-driven clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, seconds: f64) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }

    /// Move time forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now.get() + seconds.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
