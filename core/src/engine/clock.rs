//! Monotonic millisecond clocks
//!
//! The engine only reads the clock to turn a requested delay into an absolute
//! deadline. The driver uses `wait_until` to honor that deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time in milliseconds
pub trait Clock {
    /// Current time in ms
    fn now_ms(&self) -> u64;

    /// Block (or fast-forward) until `deadline_ms` has been reached
    fn wait_until(&self, deadline_ms: u64);
}

/// Wall-clock backed monotonic time, counted from construction
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
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn wait_until(&self, deadline_ms: u64) {
        let now = self.now_ms();
        if deadline_ms > now {
            std::thread::sleep(Duration::from_millis(deadline_ms - now));
        }
    }
}

/// Manually driven clock for tests and simulations
///
/// Clones share the same counter, so a test can keep a handle and move time
/// while the engine owns another. `wait_until` jumps straight to the deadline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn wait_until(&self, deadline_ms: u64) {
        self.now.fetch_max(deadline_ms, Ordering::SeqCst);
    }
}
