//! `file:line:col: CODE message` output, shared by flake8 and pylint.

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

/// Severity of a pycodestyle/pyflakes/pylint message class. Unmapped
/// classes default to warning.
pub(crate) fn code_severity(code: &str) -> Severity {
    match code.chars().next() {
        Some('E') | Some('F') => Severity::Error,
        Some('W') => Severity::Warning,
        Some('C') | Some('R') | Some('D') => Severity::Note,
        _ => Severity::Warning,
    }
}

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues: Vec<Issue> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        // OS errors surface as "[Errno 2] No such file or directory: ..."
        if let Some(rest) = line.strip_prefix("[Errno") {
            let (code, message) = match rest.split_once("] ") {
                Some((num, message)) => (format!("Errno{}", num.trim()), message),
                None => ("Errno".to_string(), rest),
            };
            issues.push(Issue::new(tool, Severity::Error, code, message));
            continue;
        }

        // Section banners and the pylint score footer.
        if line.starts_with("**********")
            || line.starts_with("----------")
            || line.starts_with("Your code has been rated")
        {
            continue;
        }

        match split_location(line) {
            Some((file, line_no, column, rest)) => {
                let (code, message) = match rest.trim().split_once(' ') {
                    Some((code, message)) => (code.trim_end_matches(':'), message),
                    None => (rest.trim(), ""),
                };
                issues.push(
                    Issue::new(tool, code_severity(code), code, message).at(
                        file,
                        Some(line_no),
                        Some(column),
                    ),
                );
            }
            // Continuation lines (pylint duplicate-code listings and the
            // like) attach to the issue above them.
            None => {
                if let Some(last) = issues.last_mut() {
                    last.add_note(line);
                }
            }
        }
    }

    Ok(issues)
}

fn split_location(line: &str) -> Option<(&str, u32, u32, &str)> {
    let mut parts = line.splitn(4, ':');
    let file = parts.next()?;
    let line_no: u32 = parts.next()?.trim().parse().ok()?;
    let column: u32 = parts.next()?.trim().parse().ok()?;
    let rest = parts.next()?;
    if file.is_empty() {
        return None;
    }
    Some((file, line_no, column, rest))
}
