//! Alarm configuration.
//!
//! The firmware keeps one JSON application config; this crate reads its
//! `alarm` section and ignores everything else.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alarm::{AlarmKind, Timeouts, Transition};
use crate::{Error, Result};

/// Highest sensitivity the vendor detectors accept.
pub const MAX_SENSITIVITY: u32 = 255;

/// Alarm section of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Master switch; when false every lifecycle call is a no-op.
    pub enable: bool,
    /// Seconds without a motion event before motion is reported lost.
    pub motion_timeout: u64,
    /// Seconds without a humanoid event before humanoid is reported lost.
    pub humanoid_timeout: u64,
    pub motion_sens: u32,
    pub humanoid_sens: u32,
    pub motion_detect_exec: Option<String>,
    pub motion_lost_exec: Option<String>,
    pub humanoid_detect_exec: Option<String>,
    pub humanoid_lost_exec: Option<String>,
    /// Kill hook commands running longer than this; `0` waits indefinitely.
    pub command_timeout_secs: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            enable: false,
            motion_timeout: 60,
            humanoid_timeout: 60,
            motion_sens: 150,
            humanoid_sens: 150,
            motion_detect_exec: None,
            motion_lost_exec: None,
            humanoid_detect_exec: None,
            humanoid_lost_exec: None,
            command_timeout_secs: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AppConfigFile {
    #[serde(default)]
    alarm: AlarmConfig,
}

impl AlarmConfig {
    /// Parse the `alarm` section out of a full application config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: AppConfigFile = serde_json::from_str(json)?;
        file.alarm.validate()?;
        Ok(file.alarm)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("motion_sens", self.motion_sens),
            ("humanoid_sens", self.humanoid_sens),
        ] {
            if value > MAX_SENSITIVITY {
                return Err(Error::config(format!(
                    "{name} must be at most {MAX_SENSITIVITY}, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn sensitivity(&self, kind: AlarmKind) -> u32 {
        match kind {
            AlarmKind::Motion => self.motion_sens,
            AlarmKind::Humanoid => self.humanoid_sens,
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            motion: self.motion_timeout,
            humanoid: self.humanoid_timeout,
        }
    }

    /// Hook command for a transition of `kind`, if one is configured.
    pub fn command_for(&self, kind: AlarmKind, transition: Transition) -> Option<&str> {
        let command = match (kind, transition) {
            (AlarmKind::Motion, Transition::Detected) => &self.motion_detect_exec,
            (AlarmKind::Motion, Transition::Lost) => &self.motion_lost_exec,
            (AlarmKind::Humanoid, Transition::Detected) => &self.humanoid_detect_exec,
            (AlarmKind::Humanoid, Transition::Lost) => &self.humanoid_lost_exec,
        };
        command.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Load the alarm configuration from an application config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<AlarmConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config = AlarmConfig::from_json_str(&json)?;
    debug!(path = %path.display(), enabled = config.enable, "Loaded alarm configuration");
    Ok(config)
}
