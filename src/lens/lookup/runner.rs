//! Subprocess execution for the route query tool
//!
//! [`ProcessRunner`] is the seam between the lookup pipeline and the
//! operating system. [`TokioProcessRunner`] is the real implementation; tests
//! substitute their own runner to script tool behaviour.
//!
//! # Child lifecycle
//!
//! - the program is spawned directly, never through a shell
//! - stdin is closed, stdout and stderr are drained concurrently, then the
//!   exit status is collected
//! - stdout is read up to a size cap; a child that writes more is killed and
//!   reported as an unsuccessful run
//! - on timeout the child is killed and reaped before returning
//! - the child is spawned with `kill_on_drop`, so dropping the future returned
//!   by [`ProcessRunner::run`] (e.g. the HTTP client went away) kills it too

use super::command::CommandSpec;
use crate::error::ExecutionError;
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info, warn};

/// Maximum number of stderr bytes retained for diagnostics
const MAX_STDERR_SIZE: usize = 4 * 1024;

/// Default limit on captured stdout
pub const MAX_STDOUT_SIZE: usize = 32 * 1024 * 1024;

/// Outcome of one subprocess run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Exited with status zero within the deadline
    Success(Vec<u8>),
    /// Still running at the deadline; killed
    TimedOut,
    /// Exited unsuccessfully. `code` is `None` when killed by a signal.
    NonZeroExit { code: Option<i32>, stderr: String },
    /// Could not be started at all
    SpawnFailure(String),
}

impl ExecutionResult {
    /// Unwrap the captured stdout, or classify the failure.
    ///
    /// `timeout` is the limit the run was given, reported in `TimedOut`.
    pub fn into_stdout(self, timeout: Duration) -> Result<Vec<u8>, ExecutionError> {
        match self {
            ExecutionResult::Success(stdout) => Ok(stdout),
            ExecutionResult::TimedOut => Err(ExecutionError::TimedOut(timeout)),
            ExecutionResult::NonZeroExit { code, stderr } => {
                Err(ExecutionError::NonZeroExit { code, stderr })
            }
            ExecutionResult::SpawnFailure(cause) => Err(ExecutionError::SpawnFailure(cause)),
        }
    }
}

/// Runs a [`CommandSpec`] to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> ExecutionResult;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    max_stdout: usize,
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self {
            max_stdout: MAX_STDOUT_SIZE,
        }
    }
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stdout size cap
    pub fn with_max_stdout(mut self, max_stdout: usize) -> Self {
        self.max_stdout = max_stdout;
        self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> ExecutionResult {
        let start = Instant::now();

        let spawned = Command::new(spec.program())
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn '{}': {}", spec.program().display(), e);
                return ExecutionResult::SpawnFailure(e.to_string());
            }
        };
        debug!("Spawned pid {:?}: {}", child.id(), spec);

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            reap(&mut child).await;
            return ExecutionResult::SpawnFailure("child output was not captured".to_string());
        };

        let max_stdout = self.max_stdout;
        let completed = tokio::time::timeout(
            spec.timeout(),
            capture(&mut child, stdout, stderr, max_stdout),
        )
        .await;

        let elapsed = start.elapsed();
        match completed {
            Ok(Ok((None, _))) => {
                warn!(
                    "Command output exceeded {} bytes after {:?}: {}",
                    max_stdout, elapsed, spec
                );
                reap(&mut child).await;
                ExecutionResult::NonZeroExit {
                    code: None,
                    stderr: format!("stdout exceeded {} bytes", max_stdout),
                }
            }
            Ok(Ok((Some((status, stdout)), stderr))) => {
                if status.success() {
                    info!(
                        "Command succeeded in {:?} ({} bytes output): {}",
                        elapsed,
                        stdout.len(),
                        spec
                    );
                    ExecutionResult::Success(stdout)
                } else {
                    let stderr = truncate_lossy(&stderr, MAX_STDERR_SIZE);
                    warn!(
                        "Command failed in {:?} (exit code: {:?}): {}; stderr: {}",
                        elapsed,
                        status.code(),
                        spec,
                        stderr.trim()
                    );
                    ExecutionResult::NonZeroExit {
                        code: status.code(),
                        stderr,
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("I/O error while running {}: {}", spec, e);
                reap(&mut child).await;
                ExecutionResult::SpawnFailure(e.to_string())
            }
            Err(_) => {
                warn!("Command timed out after {:?}: {}", spec.timeout(), spec);
                reap(&mut child).await;
                ExecutionResult::TimedOut
            }
        }
    }
}

/// Kill the child if it is still running and wait for it to exit
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!("Failed to kill child process: {}", e);
    }
}

/// Read both pipes to EOF, then collect the exit status.
///
/// Returns `None` instead of the status and stdout when stdout overflows
/// `max_stdout`; the child is left running for the caller to kill.
async fn capture(
    child: &mut Child,
    stdout: ChildStdout,
    stderr: ChildStderr,
    max_stdout: usize,
) -> std::io::Result<(Option<(ExitStatus, Vec<u8>)>, Vec<u8>)> {
    let (stdout, stderr) = tokio::try_join!(read_capped(stdout, max_stdout), drain_stderr(stderr))?;
    match stdout {
        Some(stdout) => {
            let status = child.wait().await?;
            Ok((Some((status, stdout)), stderr))
        }
        None => Ok((None, stderr)),
    }
}

/// Read until EOF, or `None` once more than `limit` bytes arrive
async fn read_capped<R: AsyncRead + Unpin>(
    mut reader: R,
    limit: usize,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    (&mut reader)
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .await?;
    if buf.len() > limit {
        Ok(None)
    } else {
        Ok(Some(buf))
    }
}

/// Keep the head of stderr and discard the rest so the child never blocks
async fn drain_stderr<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut reader)
        .take(MAX_STDERR_SIZE as u64 + 1)
        .read_to_end(&mut buf)
        .await?;
    tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    Ok(buf)
}

fn truncate_lossy(bytes: &[u8], max_len: usize) -> String {
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(max_len)]).to_string();
    if bytes.len() > max_len {
        format!("{}...", text)
    } else {
        text
    }
}
