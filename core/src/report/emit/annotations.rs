//! Inline CI-annotation stream (GitHub workflow commands). Presented as a
//! single group at the end of output as a work-around for the platform
//! limit on annotations actually shown per check run.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

use crate::errors::EmitError;
use crate::model::{Issue, Report, Severity};

pub fn emit(report: &Report) -> Result<String, EmitError> {
    let mut out = String::new();

    if report.incomplete {
        out.push_str("::warning title=Incomplete run::run was cancelled before every tool finished\n");
    }

    // Regroup annotations so a line of code carries at most one entry.
    // Items on the same line with the same text are treated as one.
    let mut grouped: BTreeMap<(Option<PathBuf>, u32), Vec<&Issue>> = BTreeMap::new();
    for issue in report.issues() {
        if issue.severity < Severity::Warning {
            continue;
        }
        let key = (issue.path.clone(), issue.line.unwrap_or(0));
        let group = grouped.entry(key).or_default();
        if !group
            .iter()
            .any(|seen| seen.code == issue.code && seen.message == issue.message)
        {
            group.push(issue);
        }
    }

    let mut total = 0usize;
    out.push_str("::group::Annotations\n");
    for ((path, line), issues) in &grouped {
        total += issues.len();
        if let [issue] = issues.as_slice() {
            write_command(
                &mut out,
                issue.severity,
                path.as_deref().map(|p| p.display().to_string()),
                *line,
                issue.column,
                &format!("{} {}", issue.code, issue.message),
                issue.note.as_deref().unwrap_or(""),
            );
            continue;
        }

        let severity = issues
            .iter()
            .map(|issue| issue.severity)
            .max()
            .unwrap_or(Severity::Warning);
        let body = issues
            .iter()
            .map(|issue| format!("- {} [{}] {}", issue.tool, issue.code, issue.message))
            .collect::<Vec<_>>()
            .join("\n\n");
        write_command(
            &mut out,
            severity,
            path.as_deref().map(|p| p.display().to_string()),
            *line,
            None,
            &format!("{} issues on this line", issues.len()),
            &body,
        );
    }
    out.push_str("::endgroup::\n");
    let _ = writeln!(out, "Total Issues: {total}");

    Ok(out)
}

fn write_command(
    out: &mut String,
    severity: Severity,
    path: Option<String>,
    line: u32,
    column: Option<u32>,
    title: &str,
    body: &str,
) {
    let level = match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note | Severity::Info => "notice",
    };

    let _ = write!(out, "::{level} ");
    if let Some(path) = path {
        let _ = write!(out, "file={},", escape_property(&path));
        if line > 0 {
            let _ = write!(out, "line={line},");
        }
        if let Some(column) = column {
            let _ = write!(out, "col={column},");
        }
    }
    let _ = writeln!(
        out,
        "title={}::{}",
        escape_property(title),
        escape_data(body)
    );
}

// Workflow-command escaping: properties additionally escape ':' and ','.
fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::report::aggregate;
    use crate::report::tests_support::lint_result;

    use super::*;

    #[test]
    fn empty_report_is_just_the_frame() {
        let report = aggregate(vec![], vec![], false, "run", "t");
        let text = emit(&report).unwrap();
        assert_eq!(text, "::group::Annotations\n::endgroup::\nTotal Issues: 0\n");
    }

    #[test]
    fn single_issue_keeps_its_own_annotation() {
        let issue = Issue::new("flake8", Severity::Error, "E501", "line too long")
            .at("src/x.py", Some(4), Some(80));
        let report = aggregate(vec![lint_result("flake8", vec![issue])], vec![], false, "run", "t");

        let text = emit(&report).unwrap();
        assert!(text.contains("::error file=src/x.py,line=4,col=80,title=E501 line too long::"));
    }

    #[test]
    fn same_line_issues_are_grouped() {
        let a = Issue::new("flake8", Severity::Warning, "E501", "line too long")
            .at("src/x.py", Some(4), Some(80));
        let b = Issue::new("pylint", Severity::Error, "C0301", "line too long (pylint)")
            .at("src/x.py", Some(4), Some(1));
        let report = aggregate(
            vec![lint_result("flake8", vec![a]), lint_result("pylint", vec![b])],
            vec![],
            false,
            "run",
            "t",
        );

        let text = emit(&report).unwrap();
        assert!(text.contains("title=2 issues on this line::"));
        // Group severity is the worst of its members.
        assert!(text.contains("::error file=src/x.py,line=4,"));
        assert!(text.contains("Total Issues: 2"));
    }

    #[test]
    fn notes_and_infos_are_not_annotated() {
        let note = Issue::new("pylint", Severity::Note, "R0903", "too few methods")
            .at("src/x.py", Some(1), None);
        let report = aggregate(vec![lint_result("pylint", vec![note])], vec![], false, "run", "t");
        assert!(emit(&report).unwrap().contains("Total Issues: 0"));
    }

    #[test]
    fn incomplete_run_is_flagged_first() {
        let report = aggregate(vec![], vec![], true, "run", "t");
        assert!(emit(&report)
            .unwrap()
            .starts_with("::warning title=Incomplete run::"));
    }
}
