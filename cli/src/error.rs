use thiserror::Error;

use caracal_core::errors::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not determine working directory")]
    Cwd(#[source] std::io::Error),

    #[error("failed to prepare report directory: {path}")]
    ReportDir { path: String, #[source] source: std::io::Error },
}
