//! Crate-wide error types.

use thiserror::Error;

use crate::alarm::SdkError;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{call} failed: {source}")]
    Sdk {
        call: &'static str,
        #[source]
        source: SdkError,
    },

    #[error("Alarm event descriptor is missing")]
    InvalidEvent,

    #[error("Unknown alarm type: {0}")]
    UnknownKind(u32),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport is not ready")]
    TransportNotReady,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Command `{command}` exited with code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Command `{command}` timed out after {secs}s")]
    CommandTimeout { command: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No tokio runtime available to spawn the alarm monitor")]
    NoRuntime,

    #[error("Alarm monitor did not shut down cleanly: {0}")]
    MonitorJoin(String),

    #[error("Alarm monitor is already running")]
    MonitorAlreadyRunning,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{operation} failed at: {}", .steps.join(", "))]
    StepsFailed {
        operation: &'static str,
        steps: Vec<&'static str>,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn sdk(call: &'static str, source: SdkError) -> Self {
        Self::Sdk { call, source }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Collects the names of failed steps of an operation that never short-circuits.
#[derive(Debug)]
pub(crate) struct StepFailures {
    operation: &'static str,
    steps: Vec<&'static str>,
}

impl StepFailures {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: Vec::new(),
        }
    }

    /// Record a step's outcome, returning whether it succeeded.
    pub(crate) fn record<T>(&mut self, step: &'static str, result: &Result<T>) -> bool {
        if result.is_err() {
            self.steps.push(step);
        }
        result.is_ok()
    }

    pub(crate) fn into_result(self) -> Result<()> {
        if self.steps.is_empty() {
            Ok(())
        } else {
            Err(Error::StepsFailed {
                operation: self.operation,
                steps: self.steps,
            })
        }
    }
}
