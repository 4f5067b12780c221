//! Cobertura coverage XML for coverage viewers. Uses the first coverage
//! payload in the report; without one the artifact is an empty, still
//! schema-valid coverage document.

use std::fmt::Write;

use crate::errors::EmitError;
use crate::model::{Coverage, Report};

use super::xml::{escape, rate};

pub fn emit(report: &Report) -> Result<String, EmitError> {
    let empty = Coverage::default();
    let coverage = report.coverage().unwrap_or(&empty);

    let timestamp = chrono::DateTime::parse_from_rfc3339(&report.generated_at)
        .map(|t| t.timestamp())
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" ?>\n");
    let _ = writeln!(
        out,
        "<coverage line-rate=\"{}\" branch-rate=\"0\" lines-covered=\"{}\" lines-valid=\"{}\" \
         branches-covered=\"0\" branches-valid=\"0\" complexity=\"0\" version=\"caracal\" \
         timestamp=\"{timestamp}\">",
        rate(coverage.line_rate()),
        coverage.lines_covered(),
        coverage.lines_valid()
    );
    out.push_str("  <sources>\n    <source>.</source>\n  </sources>\n");

    if coverage.files.is_empty() {
        out.push_str("  <packages/>\n");
    } else {
        out.push_str("  <packages>\n");
        let _ = writeln!(
            out,
            "    <package name=\"caracal\" line-rate=\"{}\" branch-rate=\"0\" complexity=\"0\">",
            rate(coverage.line_rate())
        );
        out.push_str("      <classes>\n");

        // BTreeMap iteration keeps file order deterministic.
        for (path, file) in &coverage.files {
            let class_name = path
                .trim_end_matches(".py")
                .replace(['/', '\\'], ".");
            let _ = writeln!(
                out,
                "        <class name=\"{}\" filename=\"{}\" line-rate=\"{}\" branch-rate=\"0\" \
                 complexity=\"0\">",
                escape(&class_name),
                escape(path),
                rate(file.line_rate())
            );
            out.push_str("          <methods/>\n          <lines>\n");

            let mut lines: Vec<(u32, u8)> = file
                .covered
                .iter()
                .map(|line| (*line, 1))
                .chain(file.missing.iter().map(|line| (*line, 0)))
                .collect();
            lines.sort_unstable();
            for (number, hits) in lines {
                let _ = writeln!(
                    out,
                    "            <line number=\"{number}\" hits=\"{hits}\"/>"
                );
            }

            out.push_str("          </lines>\n        </class>\n");
        }

        out.push_str("      </classes>\n    </package>\n  </packages>\n");
    }

    out.push_str("</coverage>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::model::{FileCoverage, RunResult};
    use crate::report::aggregate;
    use crate::report::tests_support::lint_result;

    use super::*;

    fn coverage_result() -> RunResult {
        let mut result = lint_result("coverage", vec![]);
        let mut coverage = Coverage::default();
        coverage.files.insert(
            "src/x.py".to_string(),
            FileCoverage {
                covered: vec![1, 2, 4],
                missing: vec![3],
            },
        );
        result.coverage = Some(coverage);
        result
    }

    #[test]
    fn no_coverage_payload_still_emits() {
        let report = aggregate(vec![], vec![], false, "run", "2026-02-01T10:00:00Z");
        let text = emit(&report).unwrap();
        assert!(text.contains("line-rate=\"1.0000\""));
        assert!(text.contains("<packages/>"));
    }

    #[test]
    fn file_lines_are_listed_in_order() {
        let report = aggregate(
            vec![coverage_result()],
            vec![],
            false,
            "run",
            "2026-02-01T10:00:00Z",
        );
        let text = emit(&report).unwrap();
        assert!(text.contains("lines-covered=\"3\" lines-valid=\"4\""));
        assert!(text.contains("filename=\"src/x.py\""));

        let l2 = text.find("<line number=\"2\" hits=\"1\"/>").unwrap();
        let l3 = text.find("<line number=\"3\" hits=\"0\"/>").unwrap();
        assert!(l2 < l3);
    }

    #[test]
    fn emission_is_deterministic() {
        let report = aggregate(
            vec![coverage_result()],
            vec![],
            false,
            "run",
            "2026-02-01T10:00:00Z",
        );
        assert_eq!(emit(&report).unwrap(), emit(&report).unwrap());
    }
}
