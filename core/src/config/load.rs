use std::path::Path;

use crate::errors::ConfigError;

use super::types::AppConfig;

pub const CONFIG_FILE: &str = "caracal.toml";

/// Load configuration for a project root.
///
/// An explicitly requested file must exist; the default `caracal.toml` is
/// optional and falls back to built-in defaults. Environment variables
/// override the file.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (root.join(CONFIG_FILE), false),
    };

    let mut cfg = if path.is_file() {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str::<AppConfig>(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else if required {
        return Err(ConfigError::Validation(format!(
            "config file not found: {}",
            path.display()
        )));
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        AppConfig::default()
    };

    if let Ok(v) = std::env::var("CARACAL_REPORT_DIR") {
        if !v.trim().is_empty() {
            cfg.report_dir = v;
        }
    }
    if let Ok(v) = std::env::var("CARACAL_TIMEOUT_SECS") {
        if !v.trim().is_empty() {
            cfg.timeout_secs = v.trim().parse().map_err(|_| ConfigError::EnvInvalid {
                key: "CARACAL_TIMEOUT_SECS".to_string(),
                value: v.clone(),
            })?;
        }
    }
    if let Ok(v) = std::env::var("CARACAL_WORKERS") {
        if !v.trim().is_empty() {
            cfg.workers = Some(v.trim().parse().map_err(|_| ConfigError::EnvInvalid {
                key: "CARACAL_WORKERS".to_string(),
                value: v.clone(),
            })?);
        }
    }

    Ok(cfg)
}
