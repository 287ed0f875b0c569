//! Alarm lifecycle: bringing the vendor alarm feature and the monitor up and down.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::clock::{Clock, SystemClock};
use super::command::{CommandRunner, ShellCommandRunner};
use super::ingest::AlarmEventIngest;
use super::kind::{AlarmKind, AlarmState};
use super::monitor::AlarmMonitor;
use super::publish::AlarmTransport;
use super::sdk::{AlarmEventHandler, AlarmSdk, DETECTION_RESOLUTION, OverlaySink};
use super::timestamps::AlarmTimestamps;
use crate::config::AlarmConfig;
use crate::error::StepFailures;
use crate::{Error, Result};

struct MonitorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the alarm subsystem for one camera.
pub struct AlarmService {
    config: Arc<AlarmConfig>,
    sdk: Arc<dyn AlarmSdk>,
    transport: Arc<dyn AlarmTransport>,
    runner: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    timestamps: Arc<AlarmTimestamps>,
    handler: Arc<dyn AlarmEventHandler>,
    state: Arc<RwLock<AlarmState>>,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl AlarmService {
    /// Create a service using the system clock and `sh -c` hook commands.
    pub fn new(
        config: AlarmConfig,
        sdk: Arc<dyn AlarmSdk>,
        overlay: Arc<dyn OverlaySink>,
        transport: Arc<dyn AlarmTransport>,
    ) -> Self {
        let runner = ShellCommandRunner::new().with_timeout(config.command_timeout_secs);
        Self::with_parts(
            config,
            sdk,
            overlay,
            transport,
            Arc::new(runner),
            Arc::new(SystemClock),
        )
    }

    /// Create a service with explicit command runner and clock.
    pub fn with_parts(
        config: AlarmConfig,
        sdk: Arc<dyn AlarmSdk>,
        overlay: Arc<dyn OverlaySink>,
        transport: Arc<dyn AlarmTransport>,
        runner: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let timestamps = Arc::new(AlarmTimestamps::new());
        let handler: Arc<dyn AlarmEventHandler> = Arc::new(AlarmEventIngest::new(
            timestamps.clone(),
            overlay,
            clock.clone(),
        ));

        Self {
            config: Arc::new(config),
            sdk,
            transport,
            runner,
            clock,
            timestamps,
            handler,
            state: Arc::new(RwLock::new(AlarmState::default())),
            monitor: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    /// Last debounced state computed by the monitor.
    pub fn state(&self) -> AlarmState {
        *self.state.read()
    }

    /// Whether the monitor task is alive.
    pub fn is_running(&self) -> bool {
        self.monitor
            .lock()
            .as_ref()
            .is_some_and(|m| !m.task.is_finished())
    }

    /// Initialize the vendor alarm feature and start the monitor.
    ///
    /// Does nothing when alarms are disabled. On failure everything set up so
    /// far is torn down with [`free`](Self::free), whose own errors are only logged.
    pub async fn init(&self) -> Result<()> {
        debug!("Alarm init called");

        if !self.config.enable {
            info!("Alarm init skipped, because alarms are disabled");
            return Ok(());
        }

        let result = self.init_steps();
        match &result {
            Ok(()) => info!("Alarm init completed"),
            Err(e) => {
                error!(error = %e, "Alarm init failed");
                match self.free().await {
                    Ok(()) => debug!("Alarm cleanup after failed init succeeded"),
                    Err(e) => warn!(error = %e, "Alarm cleanup after failed init failed"),
                }
            }
        }
        result
    }

    fn init_steps(&self) -> Result<()> {
        let resolution_type = self
            .sdk
            .change_resolution_type(DETECTION_RESOLUTION)
            .map_err(|e| Error::sdk("change_resolution_type", e))?;
        debug!(resolution = ?DETECTION_RESOLUTION, resolution_type, "Detection resolution selected");

        let size = self
            .sdk
            .picture_size(resolution_type)
            .map_err(|e| Error::sdk("picture_size", e))?;

        self.sdk
            .alarm_init(size.width, size.height)
            .map_err(|e| Error::sdk("alarm_init", e))?;
        debug!(width = size.width, height = size.height, "Vendor alarm feature initialized");

        for kind in AlarmKind::ALL {
            let sensitivity = self.config.sensitivity(kind);
            self.sdk
                .set_alarm_sensitivity(kind, sensitivity)
                .map_err(|e| Error::sdk("set_alarm_sensitivity", e))?;
            debug!(kind = %kind, sensitivity, "Alarm sensitivity set");
        }

        // Events delivered from registration onwards must reach the monitor.
        self.timestamps.reset();
        *self.state.write() = AlarmState::default();

        self.sdk
            .register_alarm_handler(self.handler.clone())
            .map_err(|e| Error::sdk("register_alarm_handler", e))?;

        self.start_monitor()
    }

    fn start_monitor(&self) -> Result<()> {
        let mut slot = self.monitor.lock();
        if slot.as_ref().is_some_and(|m| !m.task.is_finished()) {
            return Err(Error::MonitorAlreadyRunning);
        }

        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let monitor = AlarmMonitor::new(
            self.config.clone(),
            self.timestamps.clone(),
            self.transport.clone(),
            self.runner.clone(),
            self.clock.clone(),
            self.state.clone(),
        );
        let cancel = CancellationToken::new();
        let task = runtime.spawn(monitor.run(cancel.clone()));

        *slot = Some(MonitorHandle { cancel, task });
        Ok(())
    }

    /// Enable or disable detection of both kinds.
    ///
    /// Both kinds are always attempted; any failure fails the call.
    pub fn switch(&self, enabled: bool) -> Result<()> {
        if !self.config.enable {
            info!("Alarm switch ignored, because alarms are disabled");
            return Ok(());
        }

        info!(enabled, "Switching alarms");
        let mut failures = StepFailures::new("alarm_switch");

        for kind in AlarmKind::ALL {
            let step = match kind {
                AlarmKind::Motion => "set_alarm_switch(motion)",
                AlarmKind::Humanoid => "set_alarm_switch(humanoid)",
            };
            let result = self
                .sdk
                .set_alarm_switch(kind, enabled)
                .map_err(|e| Error::sdk(step, e));
            if let Err(e) = &result {
                warn!(kind = %kind, error = %e, "Failed to switch alarm");
            }
            failures.record(step, &result);
        }

        failures.into_result()
    }

    /// Disable alarms, stop the monitor and release the vendor alarm feature.
    ///
    /// Every step runs even if an earlier one failed.
    pub async fn free(&self) -> Result<()> {
        debug!("Alarm free called");
        let mut failures = StepFailures::new("alarm_free");

        let result = self.switch(false);
        if let Err(e) = &result {
            warn!(error = %e, "Failed to disable alarms");
        }
        failures.record("alarm_switch(false)", &result);

        let monitor = self.monitor.lock().take();
        if let Some(monitor) = monitor {
            let result = stop_monitor(monitor).await;
            if let Err(e) = &result {
                warn!(error = %e, "Failed to stop alarm monitor");
            }
            failures.record("stop_monitor", &result);
        }

        let result = self
            .sdk
            .clear_alarm_handler(&self.handler)
            .map_err(|e| Error::sdk("clear_alarm_handler", e));
        if let Err(e) = &result {
            warn!(error = %e, "Failed to clear alarm handler");
        }
        failures.record("clear_alarm_handler", &result);

        let result = self
            .sdk
            .alarm_exit()
            .map_err(|e| Error::sdk("alarm_exit", e));
        if let Err(e) = &result {
            warn!(error = %e, "Failed to exit vendor alarm feature");
        }
        failures.record("alarm_exit", &result);

        let result = failures.into_result();
        debug!(success = result.is_ok(), "Alarm free completed");
        result
    }
}

async fn stop_monitor(monitor: MonitorHandle) -> Result<()> {
    monitor.cancel.cancel();
    monitor
        .task
        .await
        .map_err(|e| Error::MonitorJoin(e.to_string()))
}
