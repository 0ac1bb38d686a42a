//! `tokio::process` based runner.

use async_trait::async_trait;
use std::io::{BufRead, BufReader, PipeReader};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::invocation::Invocation;

use super::error::RunnerError;
use super::traits::ProcessRunner;
use super::types::{ExitReport, ProcessRun, RunOutput};

/// Lines buffered between the pipe reader and the consumer.
const DEFAULT_LINE_BUFFER: usize = 64;

/// Runs the downloader as a real child process.
///
/// stdout and stderr share one pipe, so lines arrive in the order the child
/// wrote them.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Option<Duration>,
    line_buffer: usize,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    /// Creates a runner without a watchdog.
    pub fn new() -> Self {
        Self {
            timeout: None,
            line_buffer: DEFAULT_LINE_BUFFER,
        }
    }

    /// Kills any run that lasts longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many lines may queue up before the pipe reader blocks.
    pub fn with_line_buffer(mut self, lines: usize) -> Self {
        self.line_buffer = lines.max(1);
        self
    }

    fn spawn(&self, invocation: &Invocation) -> Result<(Child, PipeReader), RunnerError> {
        let program = invocation.program();
        let (reader, writer) = std::io::pipe()?;

        // The command holds the parent's copies of the write end; it must be
        // dropped after spawning or the reader never sees EOF.
        let mut command = Command::new(program);
        command
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);
        // Own process group, so the watchdog can reach post-processors too
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::BinaryNotFound {
                    path: program.to_path_buf(),
                }
            } else {
                RunnerError::Spawn {
                    path: program.to_path_buf(),
                    source: e,
                }
            }
        })?;
        drop(command);

        Ok((child, reader))
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    fn name(&self) -> &str {
        "command"
    }

    async fn start(&self, invocation: &Invocation) -> Result<ProcessRun, RunnerError> {
        let (child, pipe) = self.spawn(invocation)?;
        debug!(
            "Started {} (pid {:?})",
            invocation.program().display(),
            child.id()
        );

        let (output_tx, output_rx) = mpsc::channel(self.line_buffer);
        let (exit_tx, exit_rx) = oneshot::channel();

        let line_tx = output_tx.clone();
        let reader = tokio::task::spawn_blocking(move || forward_lines(pipe, line_tx));
        tokio::spawn(supervise(child, reader, output_tx, self.timeout, exit_tx));

        Ok(ProcessRun::new(output_rx, exit_rx))
    }
}

/// Copies lines from the merged pipe into the channel until it closes.
///
/// Keeps reading after the consumer has gone away so the child never blocks on
/// a full pipe.
fn forward_lines(pipe: PipeReader, tx: mpsc::Sender<RunOutput>) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                // Receiver dropped: keep draining, discard
                let _ = tx.blocking_send(RunOutput::Line(line));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Failed to read downloader output: {}", e);
                break;
            }
        }
    }
}

/// Waits for the pipe to close and the child to exit, enforcing the watchdog
/// if one is set.
async fn supervise(
    mut child: Child,
    reader: JoinHandle<()>,
    output_tx: mpsc::Sender<RunOutput>,
    timeout: Option<Duration>,
    exit_tx: oneshot::Sender<Result<ExitReport, RunnerError>>,
) {
    let result = match timeout {
        None => finish(&mut child, reader).await,
        Some(limit) => {
            let outcome = tokio::time::timeout(limit, finish(&mut child, reader)).await;
            match outcome {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Downloader exceeded {} seconds, killing pid {:?}",
                        limit.as_secs(),
                        child.id()
                    );
                    kill_process_group(&child);
                    if let Err(e) = child.kill().await {
                        warn!("Failed to kill downloader: {}", e);
                    }
                    // Processes outside the group may still hold the pipe open
                    let _ = output_tx.send(RunOutput::Killed).await;
                    Err(RunnerError::Timeout {
                        timeout_secs: limit.as_secs(),
                    })
                }
            }
        }
    };

    drop(output_tx);
    let _ = exit_tx.send(result);
}

/// Sends SIGKILL to every process in the child's group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        warn!("Failed to kill downloader process group {}: {}", pgid, e);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

async fn finish(child: &mut Child, reader: JoinHandle<()>) -> Result<ExitReport, RunnerError> {
    if let Err(e) = reader.await {
        warn!("Output reader task failed: {}", e);
    }

    let status = child.wait().await?;
    Ok(ExitReport {
        code: status.code(),
    })
}
