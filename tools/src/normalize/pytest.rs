//! pytest's quiet-mode text output. Only the short-summary rows are
//! parsed; tracebacks stay in the raw capture.

use std::sync::OnceLock;

use regex::Regex;

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

/// "FAILED tests/test_x.py::test_answer - assert 4 == 5"
fn summary_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(FAILED|ERROR) (\S+)(?: - (.*))?$").unwrap())
}

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues = Vec::new();

    for line in text.lines() {
        let Some(captures) = summary_row().captures(line.trim_end()) else {
            continue;
        };

        let code = match &captures[1] {
            "FAILED" => "test-failure",
            _ => "test-error",
        };
        let test_id = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let reason = captures.get(3).map(|m| m.as_str());
        let file = test_id.split("::").next().unwrap_or(test_id);

        let mut issue = Issue::new(
            tool,
            Severity::Error,
            code,
            match reason {
                Some(reason) => format!("{test_id}: {reason}"),
                None => test_id.to_string(),
            },
        );
        // Collection errors name a directory or nothing useful; keep the
        // issue project-level in that case.
        if file.contains('.') {
            issue = issue.at(file, None, None);
        }
        issues.push(issue);
    }

    Ok(issues)
}
