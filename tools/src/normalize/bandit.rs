//! bandit's block-per-finding text output:
//!
//! ```text
//! >> Issue: [B602:subprocess_popen_with_shell_equals_true] subprocess call with shell=True
//!    Severity: High   Confidence: High
//!    CWE: CWE-78 (https://cwe.mitre.org/data/definitions/78.html)
//!    Location: src/run.py:58:17
//! --------------------------------------------------
//! ```

use std::sync::OnceLock;

use regex::Regex;

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

use super::stray_line;

fn severity_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Severity:\s+(\w+)\s+Confidence:\s+(\w+)").unwrap())
}

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.starts_with("---------------------------") {
            if let Some(issue) = block_to_issue(&block, tool, &mut issues) {
                issues.push(issue);
            }
            block.clear();
            continue;
        }
        block.push(line.trim());
    }
    // The trailing block is bandit's run summary; it carries no ">> Issue"
    // marker and is dropped by block_to_issue.
    if let Some(issue) = block_to_issue(&block, tool, &mut issues) {
        issues.push(issue);
    }

    Ok(issues)
}

fn block_to_issue(block: &[&str], tool: &str, issues: &mut Vec<Issue>) -> Option<Issue> {
    let issue_line = block.iter().find(|l| l.starts_with(">> Issue:"))?;

    let body = issue_line.trim_start_matches(">> Issue:").trim();
    let (code, message) = match body.split_once(' ') {
        Some((code, message)) => (code.trim_matches(['[', ']']), message.trim()),
        None => (body.trim_matches(['[', ']']), ""),
    };
    // "[B602:subprocess_popen_with_shell_equals_true]" — keep the rule id.
    let code = code.split(':').next().unwrap_or(code);

    let (severity, confidence) = block
        .iter()
        .find_map(|l| severity_row().captures(l))
        .map(|captures| {
            (
                captures.get(1).map_or("", |m| m.as_str()),
                captures.get(2).map_or("", |m| m.as_str()),
            )
        })
        .unwrap_or(("", ""));

    let Some(location) = block.iter().find(|l| l.starts_with("Location: ")) else {
        issues.push(stray_line(tool, issue_line));
        return None;
    };
    let Some((path, line_no, column)) = split_location(location.trim_start_matches("Location: "))
    else {
        issues.push(stray_line(tool, location));
        return None;
    };

    let cwe = block
        .iter()
        .find(|l| l.starts_with("CWE:"))
        .map(|l| l.trim_start_matches("CWE:").trim())
        .unwrap_or("");

    let mut issue = Issue::new(tool, native_severity(severity), code, message).at(
        path,
        Some(line_no),
        Some(column),
    );
    issue.add_note(&format!(
        "({severity} severity / {confidence} confidence) {cwe}"
    ));
    Some(issue)
}

fn native_severity(level: &str) -> Severity {
    match level.to_ascii_lowercase().as_str() {
        "high" => Severity::Error,
        "medium" => Severity::Warning,
        "low" => Severity::Note,
        _ => Severity::Warning,
    }
}

/// Split `path:line:col`, from the right: Windows paths carry their own
/// colon.
fn split_location(text: &str) -> Option<(String, u32, u32)> {
    let (rest, column) = text.rsplit_once(':')?;
    let (path, line_no) = rest.rsplit_once(':')?;
    Some((
        path.trim().to_string(),
        line_no.parse().ok()?,
        column.parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const OUTPUT: &str = "\
Run started:2026-02-01 10:00:00

Test results:
>> Issue: [B602:subprocess_popen_with_shell_equals_true] subprocess call with shell=True identified
   Severity: High   Confidence: High
   CWE: CWE-78 (https://cwe.mitre.org/data/definitions/78.html)
   More Info: https://bandit.readthedocs.io/en/latest/plugins/b602.html
   Location: src/run.py:58:17
--------------------------------------------------
>> Issue: [B311:blacklist] Standard pseudo-random generators are not suitable for security
   Severity: Low   Confidence: High
   CWE: CWE-330 (https://cwe.mitre.org/data/definitions/330.html)
   Location: src/util.py:9:4
--------------------------------------------------

Code scanned:
\tTotal lines of code: 321
";

    #[test]
    fn blocks_become_issues() {
        let issues = parse(OUTPUT, "bandit").unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, "B602");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].path.as_deref().unwrap().to_str(), Some("src/run.py"));
        assert_eq!(issues[0].line, Some(58));
        assert_eq!(issues[0].column, Some(17));
        assert!(issues[0]
            .note
            .as_deref()
            .unwrap()
            .starts_with("(High severity / High confidence) CWE-78"));

        assert_eq!(issues[1].code, "B311");
        assert_eq!(issues[1].severity, Severity::Note);
    }

    #[test]
    fn summary_block_is_ignored() {
        let issues = parse("Run started\n\nCode scanned:\n\tTotal lines: 10\n", "bandit").unwrap();
        assert_eq!(issues, vec![]);
    }

    #[test]
    fn block_without_location_warns() {
        let text = ">> Issue: [B101:assert_used] Use of assert detected\n   Severity: Low   Confidence: High\n--------------------------------------------------\n";
        let issues = parse(text, "bandit").unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].tool, caracal_core::ORCHESTRATOR);
    }
}
