//! Wall-clock source for alarm timestamps.

use chrono::Utc;

/// Source of epoch seconds.
///
/// Injected so the monitor can be stepped deterministically in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}
