// core/src/errors/emit_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("unknown emitter: {0}")]
    Unknown(String),

    #[error("failed to serialize report for {emitter}")]
    Serialize { emitter: &'static str, #[source] source: serde_json::Error },

    #[error("failed to write artifact: {path}")]
    Write { path: String, #[source] source: std::io::Error },
}
