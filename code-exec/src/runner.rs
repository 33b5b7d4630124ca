use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::Error;

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// stdout on success, otherwise the error stream. A failure with a silent
    /// error stream is described by its exit status instead.
    pub fn into_payload(self) -> String {
        if self.status.success() {
            self.stdout
        } else if self.stderr.trim().is_empty() {
            format!("process exited with status: {}", self.status)
        } else {
            self.stderr
        }
    }
}

/// Runs one compile or run step to completion and captures its streams
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Resolve a program the way a shell would. Paths are canonicalized
    /// against the caller's working directory, since commands run from the
    /// scratch directory. Bare names are looked up on `PATH`.
    pub fn resolve(cmd: &str) -> Result<PathBuf, Error> {
        if cmd.contains(std::path::MAIN_SEPARATOR) {
            if let Ok(path) = std::fs::canonicalize(cmd) {
                return Ok(path);
            }
        } else if let Ok(path) = which::which(cmd) {
            return Ok(path);
        }
        Err(Error::ToolchainMissing(format!("Command not found: {}", cmd)))
    }

    pub async fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput, Error> {
        let cmd_path = Self::resolve(cmd)?;
        self.run_resolved(&cmd_path, args).await
    }

    async fn run_resolved(&self, cmd_path: &Path, args: &[&str]) -> Result<CommandOutput, Error> {
        debug!("Runner execute - Command: {}", cmd_path.display());
        debug!("Runner execute - Args: {:?}", args);

        let output = Command::new(cmd_path)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::ToolchainMissing(format!(
                    "Command not found: {}",
                    cmd_path.display()
                )),
                _ => Error::Io(e),
            })?;

        debug!("Runner execute - Status: {}", output.status);

        Ok(CommandOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
