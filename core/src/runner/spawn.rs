//! Process launching behind a trait seam so the scheduler can be exercised
//! without spawning real children.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::watch;

use crate::descriptor::LaunchSpec;
use crate::errors::RunnerError;

use super::exit::normalize_exit;

/// How one launch ended, with whatever output was captured up to that
/// point. Timed-out and cancelled children still surface their partial
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Completed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        stdout: String,
        stderr: String,
    },
    Cancelled {
        stdout: String,
        stderr: String,
    },
}

/// Seam between the scheduler and the operating system. An `Err` means the
/// process never ran to completion under our control (missing executable,
/// permission denied); the scheduler records it as a launch failure.
#[async_trait]
pub trait ToolLauncher: Send + Sync {
    async fn run(
        &self,
        spec: &LaunchSpec,
        timeout: Duration,
        cancel: watch::Receiver<bool>,
    ) -> Result<LaunchOutcome, RunnerError>;
}

/// The real launcher: `tokio::process` with piped output, a hard timeout
/// and cancellation via the shared watch channel.
pub struct ProcessLauncher;

#[async_trait]
impl ToolLauncher for ProcessLauncher {
    async fn run(
        &self,
        spec: &LaunchSpec,
        timeout: Duration,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<LaunchOutcome, RunnerError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().unwrap();
        let stderr = child.stderr.take().unwrap();
        let out_task = tokio::spawn(read_to_string_lossy(stdout));
        let err_task = tokio::spawn(read_to_string_lossy(stderr));

        enum Exit {
            Completed(i32),
            TimedOut,
            Cancelled,
        }

        let exit = tokio::select! {
            res = child.wait() => match res {
                Ok(status) => Exit::Completed(normalize_exit(status)),
                Err(source) => {
                    return Err(RunnerError::Wait {
                        program: spec.program.clone(),
                        source,
                    })
                }
            },
            _ = tokio::time::sleep(timeout) => {
                kill_and_reap(&mut child).await;
                Exit::TimedOut
            }
            _ = cancelled(&mut cancel) => {
                kill_and_reap(&mut child).await;
                Exit::Cancelled
            }
        };

        // Killing the child closes the pipes, so the readers always finish.
        let stdout = out_task.await.unwrap_or_default();
        let stderr = err_task.await.unwrap_or_default();

        Ok(match exit {
            Exit::Completed(exit_code) => LaunchOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            },
            Exit::TimedOut => LaunchOutcome::TimedOut { stdout, stderr },
            Exit::Cancelled => LaunchOutcome::Cancelled { stdout, stderr },
        })
    }
}

async fn kill_and_reap(child: &mut tokio::process::Child) {
    if let Err(err) = child.start_kill() {
        tracing::debug!(error = %err, "kill failed, child likely already exited");
    }
    let _ = child.wait().await;
}

async fn read_to_string_lossy(mut stream: impl AsyncRead + Unpin) -> String {
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

/// Resolves once the cancel flag flips to true; pends forever if the
/// sender goes away without cancelling.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
