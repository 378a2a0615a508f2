// src/clock/mod.rs

//! Time source used by the scheduler.
//!
//! All scheduling decisions are made against a monotonic clock measured in
//! seconds since the clock was created. Production code uses
//! [`MonotonicClock`]; tests drive time by hand through
//! [`mock::ManualClock`].

use std::fmt::Debug;
use std::time::Instant;

pub mod mock;

pub use mock::ManualClock;

/// Abstract monotonic time source.
pub trait Clock: Debug {
    /// Seconds elapsed since the clock's epoch. Never decreases.
    fn now(&self) -> f64;
}

/// Implementation backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}
