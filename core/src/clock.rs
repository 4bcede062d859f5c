//! Millisecond clock driving the preview simulators
//!
//! Simulators never read the wall clock themselves. Every transition takes an
//! explicit `now`, so the same state machine runs under a live clock in the
//! studio and under hand-picked instants in tests.

use std::time::Instant;

/// Milliseconds since an arbitrary session origin
pub type Millis = u64;

pub trait Clock {
    fn now(&self) -> Millis;
}

/// Monotonic clock measuring from its creation
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SessionClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}
