//! Debounce/timeout monitor task.
//!
//! Once per second the monitor derives the debounced state of each kind from
//! the ingest timestamps, runs the hook command for every kind that changed,
//! and publishes the combined state when anything changed.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::clock::Clock;
use super::command::CommandRunner;
use super::debounce::{DebounceTracker, TickOutcome};
use super::kind::AlarmState;
use super::publish::{AlarmTransport, publish_alarm_state};
use super::timestamps::AlarmTimestamps;
use crate::config::AlarmConfig;

/// Delay between monitor ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct AlarmMonitor {
    config: Arc<AlarmConfig>,
    timestamps: Arc<AlarmTimestamps>,
    transport: Arc<dyn AlarmTransport>,
    runner: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    tracker: DebounceTracker,
    /// Snapshot of the debounced state for readers outside the task.
    shared_state: Arc<RwLock<AlarmState>>,
}

impl AlarmMonitor {
    pub fn new(
        config: Arc<AlarmConfig>,
        timestamps: Arc<AlarmTimestamps>,
        transport: Arc<dyn AlarmTransport>,
        runner: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
        shared_state: Arc<RwLock<AlarmState>>,
    ) -> Self {
        let tracker = DebounceTracker::new(config.timeouts());
        Self {
            config,
            timestamps,
            transport,
            runner,
            clock,
            tracker,
            shared_state,
        }
    }

    /// Run one monitor iteration.
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self.tracker.tick(self.clock.now(), &self.timestamps);
        if outcome.is_empty() {
            return outcome;
        }

        let state = self.tracker.state();
        *self.shared_state.write() = state;

        for &(kind, transition) in &outcome.changes {
            info!("Change {} status: {}", kind, transition.is_active());

            let Some(command) = self.config.command_for(kind, transition) else {
                continue;
            };
            match self.runner.run(command).await {
                Ok(()) => debug!(kind = %kind, ?transition, "Alarm hook command succeeded"),
                Err(e) => error!(kind = %kind, ?transition, error = %e, "Alarm hook command failed"),
            }
        }

        if self.transport.is_ready() {
            match publish_alarm_state(self.transport.as_ref(), state).await {
                Ok(()) => debug!("Alarm state publish succeeded"),
                Err(e) => error!(error = %e, "Alarm state publish failed"),
            }
        } else {
            debug!("Transport not ready, skipping alarm state publish");
        }

        outcome
    }

    /// Tick until `cancel` fires. Cancellation is only observed between ticks.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Alarm monitor started");
        loop {
            self.tick().await;

            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(TICK_INTERVAL) => {}
            }
        }
        info!("Alarm monitor stopped");
    }
}
