//! Per-kind debounce state machine.
//!
//! Each kind is either idle or active. A nonzero timestamp moves an idle kind
//! to active on the next tick. An active kind goes back to idle on the first
//! tick where more than its timeout has elapsed since the stored timestamp,
//! and that tick clears the timestamp.

use super::kind::{AlarmKind, AlarmState};
use super::timestamps::{AlarmTimestamps, NO_EVENT};

/// Direction of a debounced state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Detected,
    Lost,
}

impl Transition {
    pub fn is_active(self) -> bool {
        matches!(self, Transition::Detected)
    }
}

/// Timeout window per kind, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub motion: u64,
    pub humanoid: u64,
}

impl Timeouts {
    pub fn get(&self, kind: AlarmKind) -> i64 {
        let secs = match kind {
            AlarmKind::Motion => self.motion,
            AlarmKind::Humanoid => self.humanoid,
        };
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}

/// State changes observed in one tick, in [`AlarmKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub changes: Vec<(AlarmKind, Transition)>,
}

impl TickOutcome {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DebounceTracker {
    timeouts: Timeouts,
    state: AlarmState,
}

impl DebounceTracker {
    pub fn new(timeouts: Timeouts) -> Self {
        Self {
            timeouts,
            state: AlarmState::default(),
        }
    }

    /// Current debounced state.
    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Evaluate every kind at `now`.
    pub fn tick(&mut self, now: i64, timestamps: &AlarmTimestamps) -> TickOutcome {
        let changes = AlarmKind::ALL
            .into_iter()
            .filter_map(|kind| self.evaluate(kind, now, timestamps).map(|t| (kind, t)))
            .collect();
        TickOutcome { changes }
    }

    fn evaluate(
        &mut self,
        kind: AlarmKind,
        now: i64,
        timestamps: &AlarmTimestamps,
    ) -> Option<Transition> {
        let last_event = timestamps.get(kind);
        if last_event == NO_EVENT {
            return None;
        }

        if !self.state.get(kind) {
            self.state.set(kind, true);
            return Some(Transition::Detected);
        }

        if now.saturating_sub(last_event) <= self.timeouts.get(kind) {
            return None;
        }

        // A refresh between the read above and this clear keeps the kind active.
        if !timestamps.clear_if(kind, last_event) {
            return None;
        }

        self.state.set(kind, false);
        Some(Transition::Lost)
    }
}
