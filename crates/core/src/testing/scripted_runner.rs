//! Scripted process runner for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::invocation::Invocation;
use crate::runner::{ExitReport, ProcessRun, ProcessRunner, RunOutput, RunnerError};

/// How a scripted run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedExit {
    /// Exit with the given code.
    Code(i32),
    /// Terminated by a signal (no exit code).
    Signal,
    /// Killed by the watchdog.
    Timeout { timeout_secs: u64 },
}

/// Output and exit status replayed for one `start` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRun {
    pub lines: Vec<String>,
    pub exit: ScriptedExit,
}

impl ScriptedRun {
    /// A run that prints `lines` and exits with `code`.
    pub fn exits<I, S>(code: i32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit: ScriptedExit::Code(code),
        }
    }

    /// A run that prints `lines` and is then killed by the watchdog.
    pub fn times_out<I, S>(timeout_secs: u64, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit: ScriptedExit::Timeout { timeout_secs },
        }
    }
}

impl Default for ScriptedRun {
    fn default() -> Self {
        Self::exits(0, Vec::<String>::new())
    }
}

/// Mock implementation of the ProcessRunner trait.
///
/// Replays queued [`ScriptedRun`]s in order, falling back to a default run once
/// the queue is empty, and records every invocation it was asked to start.
///
/// # Example
///
/// ```rust,ignore
/// use tubemirror_core::testing::{ScriptedRun, ScriptedRunner};
///
/// let runner = ScriptedRunner::new();
/// runner.push_run(ScriptedRun::exits(0, [
///     "[download] Downloading item 1 of 1",
///     "[download] 100% of 3.00MiB in 00:00:01 at 2.00MiB/s",
/// ])).await;
///
/// let orchestrator = Orchestrator::new(&config, runner.clone());
/// orchestrator.run(&config.playlists).await?;
///
/// assert_eq!(runner.start_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    /// Runs replayed in order.
    queue: Arc<RwLock<VecDeque<ScriptedRun>>>,
    /// Replayed when the queue is empty.
    default_run: Arc<RwLock<ScriptedRun>>,
    /// Invocations received, in order.
    invocations: Arc<RwLock<Vec<Invocation>>>,
    /// If set, the next start fails as if the binary were missing.
    fail_next_start: Arc<RwLock<bool>>,
}

impl ScriptedRunner {
    /// Create a new scripted runner whose default run prints nothing and exits 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a run for the next unscripted `start`.
    pub async fn push_run(&self, run: ScriptedRun) {
        self.queue.write().await.push_back(run);
    }

    /// Set the run replayed once the queue is exhausted.
    pub async fn set_default_run(&self, run: ScriptedRun) {
        *self.default_run.write().await = run;
    }

    /// Make the next `start` fail with `BinaryNotFound`.
    pub async fn fail_next_start(&self) {
        *self.fail_next_start.write().await = true;
    }

    /// Get all recorded invocations.
    pub async fn recorded_invocations(&self) -> Vec<Invocation> {
        self.invocations.read().await.clone()
    }

    /// Get the number of processes started (including failed starts).
    pub async fn start_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    async fn next_run(&self) -> ScriptedRun {
        match self.queue.write().await.pop_front() {
            Some(run) => run,
            None => self.default_run.read().await.clone(),
        }
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&self, invocation: &Invocation) -> Result<ProcessRun, RunnerError> {
        self.invocations.write().await.push(invocation.clone());

        let fail = std::mem::take(&mut *self.fail_next_start.write().await);
        if fail {
            return Err(RunnerError::BinaryNotFound {
                path: invocation.program().to_path_buf(),
            });
        }

        let run = self.next_run().await;

        let killed = matches!(run.exit, ScriptedExit::Timeout { .. });
        let (line_tx, line_rx) = mpsc::channel(run.lines.len() + 1);
        for line in run.lines {
            // Capacity covers every line plus the kill sentinel
            let _ = line_tx.try_send(RunOutput::Line(line));
        }
        if killed {
            let _ = line_tx.try_send(RunOutput::Killed);
        }
        drop(line_tx);

        let (exit_tx, exit_rx) = oneshot::channel();
        let result = match run.exit {
            ScriptedExit::Code(code) => Ok(ExitReport { code: Some(code) }),
            ScriptedExit::Signal => Ok(ExitReport { code: None }),
            ScriptedExit::Timeout { timeout_secs } => Err(RunnerError::Timeout { timeout_secs }),
        };
        let _ = exit_tx.send(result);

        Ok(ProcessRun::new(line_rx, exit_rx))
    }
}
