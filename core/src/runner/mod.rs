//! Execution scheduler: runs every tool in the effective set as an
//! isolated unit of work and collects one RunResult per tool.

mod exit;
mod spawn;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch, Semaphore};

use crate::config::AppConfig;
use crate::descriptor::ToolDescriptor;
use crate::errors::RunnerError;
use crate::model::{Issue, RunResult, RunStatus, Severity};

pub use exit::normalize_exit;
pub use spawn::{LaunchOutcome, ProcessLauncher, ToolLauncher};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    /// Project-relative source paths handed to the command templates.
    pub sources: Vec<PathBuf>,
    pub workers: usize,
}

#[derive(Debug)]
pub struct SchedulerOutcome {
    /// One result per scheduled tool, in completion order. Ordering is the
    /// aggregator's job.
    pub results: Vec<RunResult>,
    pub cancelled: bool,
}

/// Run every tool in the effective set.
///
/// Tools execute concurrently up to `opts.workers`; a tool that exits
/// non-zero, crashes, fails to launch or times out never prevents its
/// siblings from completing. The call returns once every outcome is in,
/// or — after cancellation — once the in-flight children have been
/// terminated.
pub async fn run_tools(
    tools: &[ToolDescriptor],
    cfg: &AppConfig,
    opts: &RunOptions,
    launcher: Arc<dyn ToolLauncher>,
    cancel: watch::Receiver<bool>,
) -> SchedulerOutcome {
    let semaphore = Arc::new(Semaphore::new(opts.workers.max(1)));
    let (tx, mut rx) = mpsc::channel::<RunResult>(tools.len().max(1));

    for descriptor in tools {
        let spec = descriptor.command(&opts.root, &opts.sources);
        let timeout = cfg.timeout_for(&descriptor.name);
        let descriptor = descriptor.clone();
        let semaphore = semaphore.clone();
        let launcher = launcher.clone();
        let cancel = cancel.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            // A tool that never got a worker before cancellation is not
            // launched at all.
            if *cancel.borrow() {
                let _ = tx.send(cancelled_result(&descriptor)).await;
                return;
            }

            tracing::debug!(
                tool = %descriptor.name,
                program = %spec.program,
                timeout_secs = timeout.as_secs(),
                "launching tool"
            );

            let started = Instant::now();
            let outcome = launcher.run(&spec, timeout, cancel).await;
            let result = build_result(&descriptor, outcome, started.elapsed().as_millis() as u64);

            tracing::debug!(
                tool = %result.tool,
                status = result.status.as_str(),
                duration_ms = result.duration_ms,
                "tool finished"
            );
            let _ = tx.send(result).await;
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(tools.len());
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    let cancelled = *cancel.borrow()
        || results
            .iter()
            .any(|result| result.status == RunStatus::Cancelled);

    SchedulerOutcome { results, cancelled }
}

fn build_result(
    descriptor: &ToolDescriptor,
    outcome: Result<LaunchOutcome, RunnerError>,
    duration_ms: u64,
) -> RunResult {
    let mut result = RunResult {
        tool: descriptor.name.clone(),
        category: Some(descriptor.category),
        status: RunStatus::Completed { exit_code: 0 },
        duration_ms,
        stdout: String::new(),
        stderr: String::new(),
        exit_ok: true,
        issues: Vec::new(),
        coverage: None,
    };

    match outcome {
        Ok(LaunchOutcome::Completed {
            exit_code,
            stdout,
            stderr,
        }) => {
            result.exit_ok = descriptor.exit_ok(exit_code);
            result.status = RunStatus::Completed { exit_code };
            result.stdout = stdout;
            result.stderr = stderr;
        }
        // Timeouts carry no synthetic issue; the status alone fails the
        // report.
        Ok(LaunchOutcome::TimedOut { stdout, stderr }) => {
            tracing::warn!(tool = %descriptor.name, "tool timed out, process killed");
            result.status = RunStatus::TimedOut;
            result.exit_ok = false;
            result.stdout = stdout;
            result.stderr = stderr;
        }
        Ok(LaunchOutcome::Cancelled { stdout, stderr }) => {
            result.status = RunStatus::Cancelled;
            result.stdout = stdout;
            result.stderr = stderr;
        }
        Err(err) => {
            let message = err.to_string();
            tracing::warn!(tool = %descriptor.name, error = %message, "tool failed to launch");
            result.status = RunStatus::LaunchFailed {
                message: message.clone(),
            };
            result.exit_ok = false;
            result.issues.push(Issue::orchestrator(
                Severity::Error,
                "launch-failed",
                format!("{}: {}", descriptor.name, message),
            ));
        }
    }

    result
}

fn cancelled_result(descriptor: &ToolDescriptor) -> RunResult {
    RunResult {
        tool: descriptor.name.clone(),
        category: Some(descriptor.category),
        status: RunStatus::Cancelled,
        duration_ms: 0,
        stdout: String::new(),
        stderr: String::new(),
        exit_ok: true,
        issues: Vec::new(),
        coverage: None,
    }
}
