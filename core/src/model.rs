//! Canonical result model shared by the scheduler, normalizers and emitters.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tool name used for diagnostics the orchestrator produces about itself
/// (configuration warnings, launch failures, unparsable tool output).
pub const ORCHESTRATOR: &str = "caracal";

/// Canonical severity scale. Ordering follows declaration order, so
/// `Severity::Error` compares greater than everything else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Note,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One normalized diagnostic record.
///
/// `path` is relative to the project root; `None` means the issue applies
/// to the project as a whole (e.g. a missing config file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diff: Vec<String>,
    pub tool: String,
}

impl Issue {
    pub fn new(
        tool: impl Into<String>,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: None,
            line: None,
            column: None,
            severity,
            code: code.into().trim().to_string(),
            message: message.into().trim().to_string(),
            note: None,
            diff: Vec::new(),
            tool: tool.into(),
        }
    }

    /// An issue attributed to the orchestrator itself rather than a tool.
    pub fn orchestrator(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ORCHESTRATOR, severity, code, message)
    }

    pub fn at(mut self, path: impl Into<PathBuf>, line: Option<u32>, column: Option<u32>) -> Self {
        self.path = Some(path.into());
        self.line = line;
        self.column = column;
        self
    }

    pub fn add_note(&mut self, text: &str) {
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        match &mut self.note {
            Some(note) => {
                note.push('\n');
                note.push_str(text);
            }
            None => self.note = Some(text.to_string()),
        }
    }

    pub fn add_diff_line(&mut self, line: &str) {
        self.diff.push(line.trim_end().to_string());
    }

    /// Display form of the location: `src/x.py:4`, or `[project]` when the
    /// issue has no file.
    pub fn location(&self) -> String {
        let Some(path) = &self.path else {
            return "[project]".to_string();
        };
        match self.line {
            Some(line) => format!("{}:{}", path.display(), line),
            None => path.display().to_string(),
        }
    }

    /// Total-order key within one tool: project-level issues first, then by
    /// path, line, column and rule code. Ties keep insertion order via a
    /// stable sort.
    pub fn sort_key(&self) -> (Option<&PathBuf>, u32, u32, &str) {
        (
            self.path.as_ref(),
            self.line.unwrap_or(0),
            self.column.unwrap_or(0),
            self.code.as_str(),
        )
    }
}

/// How a single tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    Completed { exit_code: i32 },
    TimedOut,
    LaunchFailed { message: String },
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed { .. } => "completed",
            RunStatus::TimedOut => "timed_out",
            RunStatus::LaunchFailed { .. } => "launch_failed",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

/// The outcome of executing one tool once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub tool: String,
    /// `None` for the orchestrator's own synthetic result.
    pub category: Option<crate::descriptor::Category>,
    pub status: RunStatus,
    pub duration_ms: u64,
    pub stdout: String,
    pub stderr: String,
    /// Exit status was zero or allow-listed as advisory for this tool.
    pub exit_ok: bool,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
}

impl RunResult {
    /// Whether this result alone forces the report into `Failed`.
    ///
    /// Cancelled runs are not failures; they mark the report incomplete
    /// instead.
    pub fn failed(&self) -> bool {
        match &self.status {
            RunStatus::Completed { .. } => !self.exit_ok,
            RunStatus::TimedOut | RunStatus::LaunchFailed { .. } => true,
            RunStatus::Cancelled => false,
        }
    }

    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }
}

/// Line coverage captured from a coverage-producing tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Keyed by project-relative file path. BTreeMap keeps emission
    /// deterministic.
    pub files: BTreeMap<String, FileCoverage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub covered: Vec<u32>,
    pub missing: Vec<u32>,
}

impl FileCoverage {
    pub fn line_rate(&self) -> f64 {
        let valid = self.covered.len() + self.missing.len();
        if valid == 0 {
            return 1.0;
        }
        self.covered.len() as f64 / valid as f64
    }
}

impl Coverage {
    pub fn lines_covered(&self) -> u64 {
        self.files.values().map(|f| f.covered.len() as u64).sum()
    }

    pub fn lines_valid(&self) -> u64 {
        self.files
            .values()
            .map(|f| (f.covered.len() + f.missing.len()) as u64)
            .sum()
    }

    pub fn line_rate(&self) -> f64 {
        let valid = self.lines_valid();
        if valid == 0 {
            return 1.0;
        }
        self.lines_covered() as f64 / valid as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Passed,
    Warnings,
    Failed,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Passed => "passed",
            OverallStatus::Warnings => "warnings",
            OverallStatus::Failed => "failed",
        }
    }
}

/// Aggregated, deterministically ordered collection of all RunResults for
/// one invocation. Built by [`crate::report::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub run_id: String,
    /// RFC 3339 timestamp of report generation.
    pub generated_at: String,
    /// Set when the run was cancelled before every tool finished.
    pub incomplete: bool,
    pub status: OverallStatus,
    pub results: Vec<RunResult>,
}

impl Report {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.results.iter().flat_map(|result| result.issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.results.iter().map(|result| result.issues.len()).sum()
    }

    /// First coverage payload in tool-name order, if any tool produced one.
    pub fn coverage(&self) -> Option<&Coverage> {
        self.results.iter().find_map(|result| result.coverage.as_ref())
    }
}
