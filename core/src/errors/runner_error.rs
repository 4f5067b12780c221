// core/src/errors/runner_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn process: {program}")]
    Spawn { program: String, #[source] source: std::io::Error },

    #[error("failed to wait for process: {program}")]
    Wait { program: String, #[source] source: std::io::Error },
}
