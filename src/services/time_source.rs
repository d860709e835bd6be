//! Injectable clock.
//!
//! Anything that expires (feedback messages, double-click detection) asks a
//! [`TimeSource`] for the current instant instead of calling
//! `Instant::now()` directly, so tests can advance time deterministically.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;
}

pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Wall clock
#[derive(Debug, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(RealTimeSource)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests
#[derive(Debug)]
pub struct TestTimeSource {
    base: Instant,
    elapsed: Mutex<Duration>,
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            *elapsed += by;
        }
    }
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        let elapsed = self.elapsed.lock().map(|e| *e).unwrap_or_default();
        self.base + elapsed
    }
}
