//! Last-seen event timestamps shared between ingest and the monitor.
//!
//! Each kind holds one atomic word of epoch seconds, `0` meaning no pending
//! event. Ingest is the only writer of nonzero values; the monitor only ever
//! clears a value it has observed, via compare-and-swap, so a refresh that
//! lands between the monitor's read and its clear is never lost.

use std::sync::atomic::{AtomicI64, Ordering};

use super::kind::AlarmKind;

/// Timestamp meaning "no pending or active event".
pub const NO_EVENT: i64 = 0;

#[derive(Debug, Default)]
pub struct AlarmTimestamps {
    slots: [AtomicI64; 2],
}

impl AlarmTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded event time for `kind`, or [`NO_EVENT`].
    pub fn get(&self, kind: AlarmKind) -> i64 {
        self.slots[kind.index()].load(Ordering::Acquire)
    }

    /// Record an event for `kind` at `timestamp`.
    pub fn record(&self, kind: AlarmKind, timestamp: i64) {
        self.slots[kind.index()].store(timestamp, Ordering::Release);
    }

    /// Clear `kind` if it still holds `observed`.
    ///
    /// Returns `false` when a newer event was recorded in the meantime.
    pub fn clear_if(&self, kind: AlarmKind, observed: i64) -> bool {
        self.slots[kind.index()]
            .compare_exchange(observed, NO_EVENT, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Forget every pending event.
    pub fn reset(&self) {
        for slot in &self.slots {
            slot.store(NO_EVENT, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let ts = AlarmTimestamps::new();
        assert_eq!(ts.get(AlarmKind::Motion), NO_EVENT);
        assert_eq!(ts.get(AlarmKind::Humanoid), NO_EVENT);
    }

    #[test]
    fn test_kinds_are_independent() {
        let ts = AlarmTimestamps::new();
        ts.record(AlarmKind::Motion, 100);
        assert_eq!(ts.get(AlarmKind::Motion), 100);
        assert_eq!(ts.get(AlarmKind::Humanoid), NO_EVENT);
    }

    #[test]
    fn test_clear_if_skips_refreshed_slot() {
        let ts = AlarmTimestamps::new();
        ts.record(AlarmKind::Humanoid, 100);
        ts.record(AlarmKind::Humanoid, 104);

        assert!(!ts.clear_if(AlarmKind::Humanoid, 100));
        assert_eq!(ts.get(AlarmKind::Humanoid), 104);

        assert!(ts.clear_if(AlarmKind::Humanoid, 104));
        assert_eq!(ts.get(AlarmKind::Humanoid), NO_EVENT);
    }

    #[test]
    fn test_reset() {
        let ts = AlarmTimestamps::new();
        ts.record(AlarmKind::Motion, 1);
        ts.record(AlarmKind::Humanoid, 2);
        ts.reset();
        assert_eq!(ts.get(AlarmKind::Motion), NO_EVENT);
        assert_eq!(ts.get(AlarmKind::Humanoid), NO_EVENT);
    }
}
