//! Time sources, in milliseconds

use parking_lot::Mutex as ParkingMutex;
use std::time::Instant;

/// A time source in a fixed unit (milliseconds)
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock: milliseconds elapsed since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Used by replay and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: ParkingMutex<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: ParkingMutex::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        *self.now_ms.lock() = now_ms;
    }

    pub fn advance(&self, delta_ms: f64) {
        *self.now_ms.lock() += delta_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock()
    }
}
