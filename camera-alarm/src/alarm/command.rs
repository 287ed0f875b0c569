//! Hook commands run on alarm state changes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use process_utils::tokio_shell_command;
use tracing::{debug, error, info, warn};

use crate::{Error, Result};

/// Runs a configured hook command to completion.
///
/// The monitor awaits every call inside its tick, so a slow command delays
/// debounce checks for both kinds and delays shutdown until it returns.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<()>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner {
    /// `None` waits for the command however long it takes.
    timeout: Option<Duration>,
}

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout_secs`; `0` disables the limit.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
        self
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str) -> Result<()> {
        let start = Instant::now();
        info!("Executing command: {}", command);

        let mut cmd = tokio_shell_command(command);
        let output = cmd.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, output).await {
                Ok(result) => result?,
                Err(_) => {
                    error!("Command timed out after {}s", limit.as_secs());
                    return Err(Error::CommandTimeout {
                        command: command.to_string(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => output.await?,
        };

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("stdout: {}", line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            warn!("stderr: {}", line);
        }

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            error!("Command exited with status: {}", output.status);
            return Err(Error::CommandFailed {
                command: command.to_string(),
                code,
            });
        }

        debug!("Command completed in {:.2}s", start.elapsed().as_secs_f64());
        Ok(())
    }
}
