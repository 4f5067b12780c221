//! Code Climate issue array, the code-quality JSON format merge-request
//! UIs ingest.

use serde::Serialize;

use crate::errors::EmitError;
use crate::model::{Report, Severity};

#[derive(Serialize)]
struct Entry {
    description: String,
    check_name: String,
    fingerprint: String,
    severity: &'static str,
    location: Location,
}

#[derive(Serialize)]
struct Location {
    path: String,
    lines: Lines,
}

#[derive(Serialize)]
struct Lines {
    begin: u32,
}

pub fn emit(report: &Report) -> Result<String, EmitError> {
    let mut entries = Vec::with_capacity(report.issue_count());

    for result in &report.results {
        for issue in &result.issues {
            let path = issue
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string());
            let line = issue.line.unwrap_or(1);

            entries.push(Entry {
                description: format!("{}: {}", issue.tool, issue.message),
                check_name: issue.code.clone(),
                fingerprint: fingerprint(&[
                    &issue.tool,
                    &issue.code,
                    &path,
                    &line.to_string(),
                    &issue.message,
                ]),
                severity: severity_name(issue.severity),
                location: Location {
                    path,
                    lines: Lines { begin: line },
                },
            });
        }
    }

    let mut text = serde_json::to_string_pretty(&entries).map_err(|source| {
        EmitError::Serialize {
            emitter: "codequality",
            source,
        }
    })?;
    text.push('\n');
    Ok(text)
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "critical",
        Severity::Warning => "major",
        Severity::Note => "minor",
        Severity::Info => "info",
    }
}

/// FNV-1a over the identifying fields. Stable across runs and platforms,
/// which is all the dashboards need to track an issue between pipelines.
fn fingerprint(parts: &[&str]) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for part in parts {
        for byte in part.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
        hash ^= 0x1f;
        hash = hash.wrapping_mul(PRIME);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::model::Issue;
    use crate::report::aggregate;

    use super::*;

    #[test]
    fn empty_report_is_an_empty_array() {
        let report = aggregate(vec![], vec![], false, "run", "t");
        assert_eq!(emit(&report).unwrap(), "[]\n");
    }

    #[test]
    fn issue_entry_shape() {
        let warning = Issue::new("flake8", Severity::Warning, "E501", "line too long")
            .at("src/x.py", Some(4), Some(80));
        let report = aggregate(
            vec![crate::report::tests_support::lint_result("flake8", vec![warning])],
            vec![],
            false,
            "run",
            "t",
        );

        let text = emit(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let entry = &parsed[0];
        assert_eq!(entry["check_name"], "E501");
        assert_eq!(entry["severity"], "major");
        assert_eq!(entry["location"]["path"], "src/x.py");
        assert_eq!(entry["location"]["lines"]["begin"], 4);
        assert_eq!(entry["fingerprint"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        let a = fingerprint(&["flake8", "E501", "x.py", "4", "long"]);
        let b = fingerprint(&["flake8", "E501", "x.py", "4", "long"]);
        let c = fingerprint(&["flake8", "E501", "x.py", "5", "long"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
