// core/src/errors/config_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("config parse error in {path}")]
    Parse { path: String, #[source] source: toml::de::Error },

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("env var invalid: {key}")]
    EnvInvalid { key: String, value: String },
}
