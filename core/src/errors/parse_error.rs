// core/src/errors/parse_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {context}")]
    InvalidJson { context: String, #[source] source: serde_json::Error },

    #[error("unexpected structure: expected {expected}, saw {saw}")]
    Structure { expected: &'static str, saw: String },
}

impl ParseError {
    pub fn structure(expected: &'static str, saw: impl Into<String>) -> Self {
        let mut saw = saw.into();
        if saw.len() > 200 {
            saw.truncate(200);
            saw.push('…');
        }
        ParseError::Structure { expected, saw }
    }
}
