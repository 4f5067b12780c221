//! `coverage json -o -` output. Populates the coverage payload rather
//! than issues; the only issue this adapter raises is a totals floor
//! violation.

use std::collections::BTreeMap;

use serde::Deserialize;

use caracal_core::errors::ParseError;
use caracal_core::model::{Coverage, FileCoverage, Issue, Severity};

use super::Normalized;

#[derive(Debug, Deserialize)]
struct CoverageDocument {
    #[serde(default)]
    files: BTreeMap<String, CoverageFile>,
    totals: Option<Totals>,
}

#[derive(Debug, Deserialize)]
struct CoverageFile {
    #[serde(default)]
    executed_lines: Vec<u32>,
    #[serde(default)]
    missing_lines: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct Totals {
    percent_covered: f64,
}

pub(crate) fn parse(text: &str, floor: Option<f64>) -> Result<Normalized, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Normalized::default());
    }

    let document: CoverageDocument =
        serde_json::from_str(text).map_err(|source| ParseError::InvalidJson {
            context: "coverage json document".to_string(),
            source,
        })?;

    // Parsed, but clearly some other JSON document.
    if document.files.is_empty() && document.totals.is_none() {
        return Err(ParseError::structure("coverage json document", text));
    }

    let mut coverage = Coverage::default();
    for (path, file) in document.files {
        coverage.files.insert(
            path,
            FileCoverage {
                covered: file.executed_lines,
                missing: file.missing_lines,
            },
        );
    }

    let mut issues = Vec::new();
    if let (Some(floor), Some(totals)) = (floor, &document.totals) {
        if totals.percent_covered < floor {
            issues.push(Issue::new(
                "coverage",
                Severity::Warning,
                "coverage-floor",
                format!(
                    "total coverage {:.1}% is below the configured floor of {floor:.1}%",
                    totals.percent_covered
                ),
            ));
        }
    }

    Ok(Normalized {
        issues,
        coverage: Some(coverage),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOCUMENT: &str = r#"{
        "meta": {"version": "7.4.0"},
        "files": {
            "src/x.py": {"executed_lines": [1, 2, 4], "missing_lines": [3]},
            "src/y.py": {"executed_lines": [1], "missing_lines": []}
        },
        "totals": {"percent_covered": 80.0}
    }"#;

    #[test]
    fn payload_is_extracted() {
        let normalized = parse(DOCUMENT, None).unwrap();
        let coverage = normalized.coverage.unwrap();

        assert_eq!(coverage.files.len(), 2);
        assert_eq!(coverage.files["src/x.py"].missing, vec![3]);
        assert_eq!(coverage.lines_covered(), 4);
        assert_eq!(coverage.lines_valid(), 5);
        assert_eq!(normalized.issues, vec![]);
    }

    #[test]
    fn floor_violation_warns() {
        let normalized = parse(DOCUMENT, Some(90.0)).unwrap();
        assert_eq!(normalized.issues.len(), 1);
        assert_eq!(normalized.issues[0].code, "coverage-floor");
        assert_eq!(normalized.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn empty_output_has_no_payload() {
        let normalized = parse("", Some(90.0)).unwrap();
        assert!(normalized.coverage.is_none());
        assert_eq!(normalized.issues, vec![]);
    }
}
