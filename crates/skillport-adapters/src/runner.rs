//! Command execution.
//!
//! Workflows never spawn processes directly. They go through
//! [`CommandRunner`], which [`ShellRunner`] implements on top of
//! `tokio::process::Command` and tests replace with a recording fake.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AdapterError, Result};

/// Default command timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable overriding [`DEFAULT_TIMEOUT_SECS`].
pub const TIMEOUT_ENV: &str = "SKILLPORT_COMMAND_TIMEOUT_SECS";

/// Maximum output size in bytes (100 KB).  Stdout and stderr are each
/// independently truncated to this limit.
const MAX_OUTPUT_BYTES: usize = 100 * 1024;

/// Captured result of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or -1 when the process was terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs one external program to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd` and capture its output.
    ///
    /// A non-zero exit is not an error here; see [`CommandRunner::run_checked`].
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;

    /// Like [`CommandRunner::run`], but a non-zero exit becomes
    /// [`AdapterError::CommandFailed`].
    async fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput> {
        let output = self.run(program, args, cwd).await?;
        if output.success() {
            return Ok(output);
        }

        let message = if output.stderr.trim().is_empty() {
            output.stdout.trim()
        } else {
            output.stderr.trim()
        };
        Err(AdapterError::CommandFailed {
            program: command_line(program, args),
            status: output.status,
            stderr: message.to_owned(),
        })
    }
}

/// `git push -u origin main` style rendering for messages and logs.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout_secs: u64,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the timeout from `SKILLPORT_COMMAND_TIMEOUT_SECS`, falling back to
    /// the default when unset or unparseable.
    pub fn from_env() -> Self {
        let timeout_secs = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}");
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Self { timeout_secs }
    }

    /// Set the timeout for each command.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let cmd_display = command_line(program, args);
        debug!(
            command = %cmd_display,
            cwd = %cwd.display(),
            timeout_secs = self.timeout_secs,
            "running command"
        );

        let child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AdapterError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        // `wait_with_output` takes ownership, so on timeout the child is
        // dropped and killed via `kill_on_drop(true)`.
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => {
                let status = output.status.code().unwrap_or(-1);
                debug!(command = %cmd_display, status, "command completed");
                Ok(CommandOutput {
                    status,
                    stdout: truncate_output(&output.stdout),
                    stderr: truncate_output(&output.stderr),
                })
            }
            Ok(Err(e)) => Err(AdapterError::IoError(e)),
            Err(_) => {
                warn!(command = %cmd_display, timeout_secs = self.timeout_secs, "command timed out");
                Err(AdapterError::Timeout {
                    seconds: self.timeout_secs,
                    program: cmd_display,
                })
            }
        }
    }
}

/// Truncate raw command output to [`MAX_OUTPUT_BYTES`], converting to a
/// lossy UTF-8 string.
fn truncate_output(raw: &[u8]) -> String {
    if raw.len() <= MAX_OUTPUT_BYTES {
        String::from_utf8_lossy(raw).into_owned()
    } else {
        let mut s = String::from_utf8_lossy(&raw[..MAX_OUTPUT_BYTES]).into_owned();
        s.push_str("\n... [output truncated at 100 KB]");
        s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
