//! JUnit XML for test-result viewers. One testsuite per tool; each issue
//! becomes a testcase so CI UIs can list diagnostics individually.

use std::fmt::Write;

use crate::errors::EmitError;
use crate::model::{Report, RunResult, RunStatus, ORCHESTRATOR};

use super::xml::{escape, seconds};

pub fn emit(report: &Report) -> Result<String, EmitError> {
    let mut suites = String::new();
    let mut total_tests = 0usize;
    let mut total_failures = 0usize;
    let mut total_errors = 0usize;
    let mut total_ms = 0u64;

    for result in &report.results {
        let (suite, tests, failures, errors) = suite_entry(result, report.incomplete);
        suites.push_str(&suite);
        total_tests += tests;
        total_failures += failures;
        total_errors += errors;
        total_ms += result.duration_ms;
    }

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<testsuites name=\"caracal\" tests=\"{total_tests}\" failures=\"{total_failures}\" \
         errors=\"{total_errors}\" time=\"{}\">",
        seconds(total_ms)
    );
    out.push_str(&suites);
    out.push_str("</testsuites>\n");
    Ok(out)
}

fn suite_entry(result: &RunResult, incomplete: bool) -> (String, usize, usize, usize) {
    let cancelled = result.status == RunStatus::Cancelled;
    // A run that failed by status alone (timeout, bad exit) still needs a
    // failing entry even though it produced no issues.
    let status_error = result.failed() && result.issues.is_empty();
    let tests = result.issues.len().max(1);
    // Orchestrator-synthesized issues (launch failures, parse failures)
    // are infrastructure errors; tool findings are failures.
    let errors = result
        .issues
        .iter()
        .filter(|issue| issue.tool == ORCHESTRATOR)
        .count()
        + usize::from(status_error);
    let failures = result.issues.len()
        - result
            .issues
            .iter()
            .filter(|issue| issue.tool == ORCHESTRATOR)
            .count();
    let skipped = usize::from(cancelled && result.issues.is_empty());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  <testsuite name=\"{}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\" \
         skipped=\"{skipped}\" time=\"{}\">",
        escape(&result.tool),
        seconds(result.duration_ms)
    );

    if incomplete {
        out.push_str("    <properties>\n");
        out.push_str("      <property name=\"incomplete\" value=\"true\"/>\n");
        out.push_str("    </properties>\n");
    }

    if result.issues.is_empty() {
        let _ = write!(
            out,
            "    <testcase classname=\"caracal.{0}\" name=\"{0}\" time=\"{1}\"",
            escape(&result.tool),
            seconds(result.duration_ms)
        );
        if cancelled {
            out.push_str(">\n      <skipped message=\"run cancelled\"/>\n    </testcase>\n");
        } else if status_error {
            let _ = writeln!(
                out,
                ">\n      <error message=\"{}\" type=\"{}\"/>\n    </testcase>",
                escape(&status_message(result)),
                result.status.as_str()
            );
        } else {
            out.push_str("/>\n");
        }
    }

    for issue in &result.issues {
        let tag = if issue.tool == ORCHESTRATOR { "error" } else { "failure" };
        let _ = writeln!(
            out,
            "    <testcase classname=\"caracal.{}\" name=\"{} {}\" time=\"0.000\">",
            escape(&result.tool),
            escape(&issue.code),
            escape(&issue.location())
        );
        let _ = write!(
            out,
            "      <{tag} message=\"{}\" type=\"{}\">",
            escape(&issue.message),
            issue.severity.as_str()
        );
        if let Some(note) = &issue.note {
            out.push_str(&escape(note));
        }
        let _ = writeln!(out, "</{tag}>");
        out.push_str("    </testcase>\n");
    }

    out.push_str("  </testsuite>\n");
    (out, tests, failures, errors)
}

fn status_message(result: &RunResult) -> String {
    match &result.status {
        RunStatus::Completed { exit_code } => format!("unexpected exit status {exit_code}"),
        RunStatus::TimedOut => "tool timed out and was killed".to_string(),
        RunStatus::LaunchFailed { message } => message.clone(),
        RunStatus::Cancelled => "run cancelled".to_string(),
    }
}
