//! ruff's `--output-format=json-lines` output: one diagnostic object per
//! line.

use serde::Deserialize;

use caracal_core::errors::ParseError;
use caracal_core::model::Issue;

use super::pylint::code_severity;
use super::stray_line;

#[derive(Debug, Deserialize)]
struct Diagnostic {
    code: Option<String>,
    message: String,
    filename: String,
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    row: u32,
    column: u32,
}

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let diagnostic: Diagnostic = match serde_json::from_str(line) {
            Ok(diagnostic) => diagnostic,
            Err(_) => {
                issues.push(stray_line(tool, line));
                continue;
            }
        };

        let code = diagnostic.code.as_deref().unwrap_or("ruff");
        let (row, column) = diagnostic
            .location
            .map(|l| (Some(l.row), Some(l.column)))
            .unwrap_or((None, None));

        issues.push(
            Issue::new(tool, code_severity(code), code, diagnostic.message).at(
                diagnostic.filename,
                row,
                column,
            ),
        );
    }

    Ok(issues)
}
