//! pydocstyle's two-line records:
//!
//! ```text
//! src/x.py:1 at module level:
//!         D100: Missing docstring in public module
//! ```

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

use super::stray_line;

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let mut issues = Vec::new();
    let mut lines = text.lines();

    while let Some(header) = lines.next() {
        let header = header.trim_end();
        if header.is_empty() || !header.contains(':') {
            continue;
        }

        let Some((file, rest)) = header.split_once(':') else {
            continue;
        };
        let Some(line_no) = rest
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok())
        else {
            issues.push(stray_line(tool, header));
            continue;
        };

        let Some(detail) = lines.next() else {
            issues.push(stray_line(tool, "no detail line after location header"));
            break;
        };
        let detail = detail.trim();
        let (code, message) = match detail.split_once(": ") {
            Some((code, message)) => (code, message),
            None => (detail, ""),
        };

        issues.push(
            Issue::new(tool, Severity::Warning, code, message).at(file, Some(line_no), None),
        );
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn record_pairs() {
        let text = "src/x.py:1 at module level:\n\
                    \tD100: Missing docstring in public module\n\
                    src/x.py:10 in public function `go`:\n\
                    \tD103: Missing docstring in public function\n";
        let issues = parse(text, "pydocstyle").unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, "D100");
        assert_eq!(issues[0].line, Some(1));
        assert_eq!(issues[1].code, "D103");
        assert_eq!(issues[1].message, "Missing docstring in public function");
    }

    #[test]
    fn empty_output_is_clean() {
        assert_eq!(parse("", "pydocstyle").unwrap(), vec![]);
    }

    #[test]
    fn header_without_detail_warns() {
        let issues = parse("src/x.py:1 at module level:\n", "pydocstyle").unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].tool, caracal_core::ORCHESTRATOR);
    }
}
