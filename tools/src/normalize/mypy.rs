//! mypy's `file:line: level: message [code]` output. Follow-up `note:`
//! rows for the same location fold into the issue above them.

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

use super::stray_line;

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues: Vec<Issue> = Vec::new();
    let mut last: Option<Issue> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() || !line.contains(':') || line.contains("Success:") {
            continue;
        }
        // "Found 3 errors in 2 files (checked 10 source files)"
        if line.starts_with("Found ") {
            continue;
        }

        let Some((file, line_no, level, message)) = split_row(line) else {
            issues.push(stray_line(tool, line));
            continue;
        };

        if level == "note" {
            if let Some(current) = &mut last {
                if current.path.as_deref() == Some(std::path::Path::new(file))
                    && current.line == Some(line_no)
                {
                    current.add_note(message);
                    continue;
                }
            }
        }

        if let Some(done) = last.take() {
            issues.push(done);
        }

        let severity = match level {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "note" => Severity::Note,
            _ => Severity::Warning,
        };

        // The rule code trails the message: "... is not defined  [name-defined]"
        let (message, code) = match message.rsplit_once("  [") {
            Some((message, code)) => (message, code.trim_end_matches(']')),
            None => (message, "mypy"),
        };

        last = Some(
            Issue::new(tool, severity, code, message).at(file, Some(line_no), None),
        );
    }

    if let Some(done) = last.take() {
        issues.push(done);
    }

    Ok(issues)
}

fn split_row(line: &str) -> Option<(&str, u32, &str, &str)> {
    let mut parts = line.splitn(4, ':');
    let file = parts.next()?;
    let line_no: u32 = parts.next()?.trim().parse().ok()?;
    let level = parts.next()?.trim();
    let message = parts.next()?.trim();
    Some((file, line_no, level, message))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn error_rows_with_codes() {
        let text = "src/m.py:12: error: Argument 1 to \"f\" has incompatible type \"str\"  [arg-type]\n\
                    Found 1 error in 1 file (checked 4 source files)\n";
        let issues = parse(text, "mypy").unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "arg-type");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].line, Some(12));
        assert!(issues[0].message.starts_with("Argument 1"));
    }

    #[test]
    fn notes_merge_into_the_preceding_issue() {
        let text = "src/m.py:12: error: Incompatible return value type  [return-value]\n\
                    src/m.py:12: note: Expected \"int\"\n\
                    src/m.py:12: note: Got \"str\"\n";
        let issues = parse(text, "mypy").unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].note.as_deref(),
            Some("Expected \"int\"\nGot \"str\"")
        );
    }

    #[test]
    fn standalone_note_is_its_own_issue() {
        let text = "src/m.py:3: note: By default the bodies of untyped functions are not checked\n";
        let issues = parse(text, "mypy").unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Note);
    }

    #[test]
    fn success_line_is_skipped() {
        let text = "Success: no issues found in 7 source files\n";
        assert_eq!(parse(text, "mypy").unwrap(), vec![]);
    }

    #[test]
    fn unreadable_row_becomes_a_warning() {
        let text = "src/m.py:notanumber: error: broken\n";
        let issues = parse(text, "mypy").unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].tool, caracal_core::ORCHESTRATOR);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
