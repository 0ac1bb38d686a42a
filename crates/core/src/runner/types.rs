//! Types shared by runner implementations.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::error::RunnerError;

/// Final status of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitReport {
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// One message on a run's output channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    /// A line of merged stdout/stderr, without its terminator.
    Line(String),
    /// The child was killed; no further lines will be read.
    Killed,
}

/// A started child process: its output lines, then its exit report.
///
/// Lines must be consumed before the exit report is available; [`wait`]
/// discards whatever the caller did not read.
///
/// [`wait`]: ProcessRun::wait
#[derive(Debug)]
pub struct ProcessRun {
    output: mpsc::Receiver<RunOutput>,
    exit: oneshot::Receiver<Result<ExitReport, RunnerError>>,
    finished: bool,
}

impl ProcessRun {
    pub fn new(
        output: mpsc::Receiver<RunOutput>,
        exit: oneshot::Receiver<Result<ExitReport, RunnerError>>,
    ) -> Self {
        Self {
            output,
            exit,
            finished: false,
        }
    }

    /// Next output line, or `None` once the output stream has closed or the
    /// child was killed.
    pub async fn next_line(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        match self.output.recv().await {
            Some(RunOutput::Line(line)) => Some(line),
            Some(RunOutput::Killed) | None => {
                self.finished = true;
                None
            }
        }
    }

    /// Drains any unread lines and waits for the child to exit.
    pub async fn wait(mut self) -> Result<ExitReport, RunnerError> {
        while self.next_line().await.is_some() {}
        self.exit.await.map_err(|_| RunnerError::Abandoned)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_then_exit() {
        let (line_tx, line_rx) = mpsc::channel(4);
        let (exit_tx, exit_rx) = oneshot::channel();
        let mut run = ProcessRun::new(line_rx, exit_rx);

        line_tx.send(RunOutput::Line("first".to_string())).await.unwrap();
        line_tx.send(RunOutput::Line("second".to_string())).await.unwrap();
        drop(line_tx);
        exit_tx.send(Ok(ExitReport { code: Some(0) })).unwrap();

        assert_eq!(run.next_line().await.as_deref(), Some("first"));
        assert_eq!(run.next_line().await.as_deref(), Some("second"));
        assert_eq!(run.next_line().await, None);
        assert!(run.wait().await.unwrap().success());
    }

    #[tokio::test]
    async fn test_wait_discards_unread_lines() {
        let (line_tx, line_rx) = mpsc::channel(4);
        let (exit_tx, exit_rx) = oneshot::channel();
        let run = ProcessRun::new(line_rx, exit_rx);

        line_tx.send(RunOutput::Line("unread".to_string())).await.unwrap();
        drop(line_tx);
        exit_tx.send(Ok(ExitReport { code: Some(1) })).unwrap();

        let report = run.wait().await.unwrap();
        assert_eq!(report.code, Some(1));
        assert!(!report.success());
    }

    #[tokio::test]
    async fn test_dropped_supervisor_is_abandoned() {
        let (line_tx, line_rx) = mpsc::channel::<RunOutput>(1);
        let (exit_tx, exit_rx) = oneshot::channel();
        let run = ProcessRun::new(line_rx, exit_rx);

        drop(line_tx);
        drop(exit_tx);

        assert!(matches!(run.wait().await, Err(RunnerError::Abandoned)));
    }

    #[tokio::test]
    async fn test_killed_ends_stream_even_if_open() {
        let (line_tx, line_rx) = mpsc::channel(4);
        let (exit_tx, exit_rx) = oneshot::channel();
        let mut run = ProcessRun::new(line_rx, exit_rx);

        line_tx
            .send(RunOutput::Line("partial".to_string()))
            .await
            .unwrap();
        line_tx.send(RunOutput::Killed).await.unwrap();
        exit_tx
            .send(Err(RunnerError::Timeout { timeout_secs: 5 }))
            .unwrap();

        assert_eq!(run.next_line().await.as_deref(), Some("partial"));
        assert_eq!(run.next_line().await, None);
        assert_eq!(run.next_line().await, None);
        assert!(matches!(
            run.wait().await,
            Err(RunnerError::Timeout { timeout_secs: 5 })
        ));
        // Sender still alive: a grandchild may hold the pipe open
        drop(line_tx);
    }
}
