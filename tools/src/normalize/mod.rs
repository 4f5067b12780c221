//! Output normalization: one adapter per declared output shape, mapping a
//! tool's raw captured output into canonical Issue records.
//!
//! Adapters are tolerant by construction. Empty output means "no issues";
//! a stray unreadable line becomes a warning issue attributed to the
//! orchestrator; a document that cannot be read at all becomes a single
//! error issue. A tool's run is never silently lost.

mod bandit;
mod coverage;
mod diff;
mod mypy;
mod pydocstyle;
mod pylint;
mod pytest;
mod reuse;
mod ruff;

use caracal_core::config::AppConfig;
use caracal_core::descriptor::{OutputFormat, ToolDescriptor};
use caracal_core::errors::ParseError;
use caracal_core::model::{Coverage, Issue, RunResult, RunStatus, Severity};

/// What an adapter extracted from one tool's output.
#[derive(Debug, Default)]
pub struct Normalized {
    pub issues: Vec<Issue>,
    pub coverage: Option<Coverage>,
}

impl Normalized {
    fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            coverage: None,
        }
    }
}

/// Run the adapter for `descriptor` over a finished RunResult, appending
/// issues and attaching any coverage payload in place.
pub fn normalize_result(descriptor: &ToolDescriptor, cfg: &AppConfig, result: &mut RunResult) {
    match result.status {
        // Nothing meaningful was captured; the scheduler already attached
        // the synthetic launch-failure issue.
        RunStatus::LaunchFailed { .. } | RunStatus::Cancelled => return,
        // Timed-out output is partial but may still parse; keep whatever
        // diagnostics made it out.
        RunStatus::Completed { .. } | RunStatus::TimedOut => {}
    }

    let parsed = match descriptor.output {
        OutputFormat::PylintText => {
            pylint::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::MypyText => {
            mypy::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::PydocstyleText => {
            pydocstyle::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::BanditText => {
            bandit::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::UnifiedDiff => {
            diff::parse(&result.stdout, &result.stderr, &descriptor.name)
                .map(Normalized::from_issues)
        }
        OutputFormat::RuffJsonLines => {
            ruff::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::ReuseJson => {
            reuse::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::PytestText => {
            pytest::parse(&result.stdout, &descriptor.name).map(Normalized::from_issues)
        }
        OutputFormat::CoverageJson => coverage::parse(&result.stdout, cfg.coverage_floor),
    };

    match parsed {
        Ok(normalized) => {
            result.issues.extend(normalized.issues);
            if normalized.coverage.is_some() {
                result.coverage = normalized.coverage;
            }
        }
        Err(err) => {
            tracing::warn!(
                tool = %descriptor.name,
                error = %err,
                "tool output did not parse"
            );
            result.issues.push(parse_failure(&descriptor.name, &err));
        }
    }
}

/// Document-level normalization failure: attributed to the orchestrator,
/// not the underlying tool, and severe enough to fail the run.
fn parse_failure(tool: &str, err: &ParseError) -> Issue {
    Issue::orchestrator(
        Severity::Error,
        "output-parse",
        format!("could not read {tool} output: {err}"),
    )
}

/// Stray-line failure: the rest of the output was readable, so this is
/// only a warning.
pub(crate) fn stray_line(tool: &str, line: &str) -> Issue {
    let mut shown = line.trim_end().to_string();
    if shown.len() > 160 {
        shown.truncate(160);
        shown.push('…');
    }
    Issue::orchestrator(
        Severity::Warning,
        "output-parse",
        format!("unreadable {tool} output line: {shown}"),
    )
}
