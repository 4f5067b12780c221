//! Wiring: config → effective tool set → scheduler → normalizers →
//! aggregator → artifact files → exit code.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;

use caracal_core::config::{self, AppConfig, EffectiveToolSet};
use caracal_core::report::emit;
use caracal_core::report::{aggregate, emit::EmitterSpec};
use caracal_core::runner::{run_tools, ProcessLauncher, RunOptions};
use caracal_core::{OverallStatus, Report};
use caracal_tools::{catalog, normalize_result};

use crate::cli::Args;
use crate::error::CliError;

pub async fn run(args: Args) -> Result<i32, CliError> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().map_err(CliError::Cwd)?,
    };

    let mut cfg = config::load(&root, args.config.as_deref())?;
    apply_cli_overrides(&mut cfg, &args);

    let catalogue = catalog();
    if args.list_tools {
        for tool in &catalogue {
            println!("{:<12} {}", tool.name, tool.category.as_str());
        }
        return Ok(0);
    }

    let effective = config::effective_tools(&catalogue, &cfg);
    for warning in &effective.warnings {
        tracing::warn!(code = %warning.code, "{}", warning.message);
    }

    let report = execute(&root, &cfg, &effective).await;
    summarize(&report);
    write_artifacts(&root, &cfg, &report)?;

    Ok(exit_code(&report))
}

fn apply_cli_overrides(cfg: &mut AppConfig, args: &Args) {
    cfg.disabled_tools.extend(args.skip.iter().cloned());
    cfg.disabled_tools.extend(args.disable.iter().cloned());
    if let Some(timeout) = args.timeout {
        cfg.timeout_secs = timeout;
    }
    if let Some(jobs) = args.jobs {
        cfg.workers = Some(jobs);
    }
    if !args.report.is_empty() {
        cfg.emitters = args.report.clone();
    }
}

async fn execute(root: &Path, cfg: &AppConfig, effective: &EffectiveToolSet) -> Report {
    let sources = config::expand_sources(root, &cfg.sources);
    tracing::debug!(?sources, tools = effective.tools.len(), "starting run");

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping in-flight tools");
            let _ = cancel_tx.send(true);
        }
        // A second interrupt aborts without a report.
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let opts = RunOptions {
        root: root.to_path_buf(),
        sources,
        workers: cfg.worker_count(),
    };

    let mut outcome = run_tools(
        &effective.tools,
        cfg,
        &opts,
        Arc::new(ProcessLauncher),
        cancel_rx,
    )
    .await;

    for result in &mut outcome.results {
        if let Some(descriptor) = effective.tools.iter().find(|t| t.name == result.tool) {
            normalize_result(descriptor, cfg, result);
        }
    }

    aggregate(
        outcome.results,
        effective.warnings.clone(),
        outcome.cancelled,
        uuid::Uuid::new_v4().to_string(),
        chrono::Utc::now().to_rfc3339(),
    )
}

fn summarize(report: &Report) {
    for result in &report.results {
        tracing::info!(
            tool = %result.tool,
            category = result.category.map(|c| c.as_str()).unwrap_or("-"),
            status = result.status.as_str(),
            issues = result.issues.len(),
            duration_ms = result.duration_ms,
            "tool result"
        );
    }
    tracing::info!(
        status = report.status.as_str(),
        issues = report.issue_count(),
        incomplete = report.incomplete,
        "run finished"
    );
}

/// Single-writer artifact step, after all workers are done. One emitter
/// failing to serialize or write is fatal for that emitter only.
fn write_artifacts(root: &Path, cfg: &AppConfig, report: &Report) -> Result<(), CliError> {
    let report_dir = root.join(&cfg.report_dir);
    let raw_dir = report_dir.join("raw");
    std::fs::create_dir_all(&raw_dir).map_err(|source| CliError::ReportDir {
        path: raw_dir.display().to_string(),
        source,
    })?;

    for result in &report.results {
        if result.stdout.is_empty() && result.stderr.is_empty() {
            continue;
        }
        let path = raw_dir.join(format!("{}.txt", result.tool));
        let mut raw = result.stdout.clone();
        if !result.stderr.is_empty() {
            raw.push_str(&result.stderr);
        }
        if let Err(err) = std::fs::write(&path, raw) {
            tracing::error!(path = %path.display(), error = %err, "raw capture not written");
        }
    }

    for name in &cfg.emitters {
        let spec: &EmitterSpec = match emit::find(name) {
            Ok(spec) => spec,
            Err(err) => {
                tracing::warn!(
                    "{err}; known formats: {}",
                    emit::names().collect::<Vec<_>>().join(", ")
                );
                continue;
            }
        };

        match emit::write_artifact(spec, &report_dir, report) {
            Ok(path) => {
                tracing::info!(emitter = spec.name, path = %path.display(), "artifact written");
            }
            Err(err) => {
                tracing::error!(emitter = spec.name, error = %err, "emitter failed");
            }
        }
    }

    Ok(())
}

/// 0 only when every tool completed and nothing erred; incomplete runs get
/// their own code so CI can distinguish an interrupt from a failure.
fn exit_code(report: &Report) -> i32 {
    if report.incomplete {
        return 3;
    }
    match report.status {
        OverallStatus::Failed => 1,
        OverallStatus::Passed | OverallStatus::Warnings => 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn report(status: OverallStatus, incomplete: bool) -> Report {
        Report {
            run_id: "r".to_string(),
            generated_at: "t".to_string(),
            incomplete,
            status,
            results: vec![],
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(&report(OverallStatus::Passed, false)), 0);
        assert_eq!(exit_code(&report(OverallStatus::Warnings, false)), 0);
        assert_eq!(exit_code(&report(OverallStatus::Failed, false)), 1);
        assert_eq!(exit_code(&report(OverallStatus::Passed, true)), 3);
    }

    #[test]
    fn cli_overrides_merge_into_config() {
        let args = crate::cli::Args {
            root: None,
            config: None,
            skip: vec!["format".to_string()],
            disable: vec!["pylint".to_string()],
            report: vec!["junit".to_string()],
            timeout: Some(90),
            jobs: Some(2),
            log_file: None,
            list_tools: false,
        };
        let mut cfg = AppConfig::default();
        apply_cli_overrides(&mut cfg, &args);

        assert_eq!(cfg.disabled_tools, vec!["format", "pylint"]);
        assert_eq!(cfg.emitters, vec!["junit"]);
        assert_eq!(cfg.timeout_secs, 90);
        assert_eq!(cfg.workers, Some(2));
    }

    #[test]
    fn artifacts_land_in_the_report_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::default();
        let report = report(OverallStatus::Passed, false);

        write_artifacts(dir.path(), &cfg, &report).unwrap();

        for artifact in ["sarif.json", "codequality.json", "junit.xml", "cobertura.xml", "annotations.txt"] {
            assert!(
                dir.path().join("reports").join(artifact).is_file(),
                "{artifact} missing"
            );
        }
    }
}
