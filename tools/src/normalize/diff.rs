//! Unified-diff check output from the formatters (black, isort). Each
//! changed file yields one issue per hunk with the hunk text attached, so
//! reviewers can see the exact edit the formatter wants.

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

use super::stray_line;

pub(crate) fn parse(stdout: &str, stderr: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues: Vec<Issue> = Vec::new();
    let mut last: Option<Issue> = None;
    let mut lines = stdout.lines();

    while let Some(line) = lines.next() {
        if let Some(error) = line.strip_prefix("error: ") {
            issues.push(format_error(error, tool));
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            if let Some(done) = last.take() {
                issues.push(done);
            }
            let file = rest.split('\t').next().unwrap_or(rest).trim();
            lines.next(); // the "+++" counterpart
            match lines.next() {
                Some(hunk) if hunk.starts_with("@@") => {
                    last = Some(hunk_issue(file, hunk, tool, &mut issues));
                }
                _ => issues.push(stray_line(tool, line)),
            }
            continue;
        }

        if line.starts_with("@@ ") {
            if let Some(done) = last.take() {
                let file = done
                    .path
                    .clone()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                issues.push(done);
                last = Some(hunk_issue(&file, line, tool, &mut issues));
            }
            continue;
        }

        if let Some(current) = &mut last {
            current.add_diff_line(line);
        }
    }
    if let Some(done) = last.take() {
        issues.push(done);
    }

    // black reports unformattable files on stderr.
    for line in stderr.lines() {
        if let Some(error) = line.strip_prefix("error: ") {
            issues.push(format_error(error, tool));
        }
    }

    Ok(issues)
}

fn hunk_issue(file: &str, hunk: &str, tool: &str, issues: &mut Vec<Issue>) -> Issue {
    let (row, count) = hunk_span(hunk).unwrap_or_else(|| {
        issues.push(stray_line(tool, hunk));
        (1, 1)
    });

    let mut issue = Issue::new(
        tool,
        Severity::Error,
        "edit",
        format!("{tool} change ({count} lines affected)"),
    )
    .at(file, Some(row), None);
    issue.add_diff_line(hunk);
    issue
}

/// `@@ -1,4 +1,5 @@` → starting line and length of the new-side span.
fn hunk_span(hunk: &str) -> Option<(u32, u32)> {
    let new = hunk.split_whitespace().nth(2)?;
    let new = new.trim_start_matches('+');
    let (row, count) = match new.split_once(',') {
        Some((row, count)) => (row, count),
        None => (new, "1"),
    };
    Some((row.parse().ok()?, count.parse().ok()?))
}

/// `cannot format src/x.py: Cannot parse: 3:10: bad input` → an error
/// issue at the offending position.
fn format_error(error: &str, tool: &str) -> Issue {
    let Some(rest) = error.strip_prefix("cannot format ") else {
        return stray_line(tool, error);
    };

    let mut parts = rest.splitn(5, ':');
    let file = parts.next().unwrap_or_default().trim();
    let reason = parts.next().unwrap_or_default().trim();
    let line_no = parts.next().and_then(|t| t.trim().parse::<u32>().ok());
    let column = parts.next().and_then(|t| t.trim().parse::<u32>().ok());

    Issue::new(tool, Severity::Error, "error", reason).at(file, line_no, column)
}
