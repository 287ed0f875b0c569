//! Small process-related helpers shared across the workspace.
//!
//! Hook commands configured by users are plain shell strings, so every helper
//! here wraps the command in the platform shell rather than splitting it.

#[cfg(feature = "tokio")]
use std::{ffi::OsStr, process::Stdio};

/// Shell used to interpret command strings.
#[cfg(not(windows))]
pub const SHELL: &str = "sh";
#[cfg(windows)]
pub const SHELL: &str = "cmd";

/// Flag passing a command string to [`SHELL`].
#[cfg(not(windows))]
pub const SHELL_FLAG: &str = "-c";
#[cfg(windows)]
pub const SHELL_FLAG: &str = "/C";

/// Configure a child process for running detached from our stdin.
pub trait HookCommandExt {
    fn detach_stdin(&mut self) -> &mut Self;
}

#[cfg(feature = "tokio")]
impl HookCommandExt for tokio::process::Command {
    fn detach_stdin(&mut self) -> &mut Self {
        self.stdin(Stdio::null())
    }
}

/// Create a `tokio::process::Command` that runs `command` through the shell.
///
/// The child is killed if the returned handle is dropped before it exits.
#[cfg(feature = "tokio")]
pub fn tokio_shell_command(command: impl AsRef<OsStr>) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(SHELL);
    cmd.arg(SHELL_FLAG).arg(command);
    cmd.detach_stdin();
    cmd.kill_on_drop(true);
    cmd
}
