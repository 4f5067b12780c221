//! `reuse lint --json`: a single JSON document describing SPDX compliance
//! for the whole tree.

use std::collections::BTreeMap;

use serde::Deserialize;

use caracal_core::errors::ParseError;
use caracal_core::model::{Issue, Severity};

const LICENSE_DIR: &str = "LICENSES";

#[derive(Debug, Default, Deserialize)]
struct LintOutput {
    #[serde(default)]
    non_compliant: NonCompliant,
}

#[derive(Debug, Default, Deserialize)]
struct NonCompliant {
    #[serde(default)]
    missing_licensing_info: Vec<String>,
    #[serde(default)]
    missing_copyright_info: Vec<String>,
    #[serde(default)]
    deprecated_licenses: Vec<String>,
    #[serde(default)]
    unused_licenses: Vec<String>,
    /// License id → files referencing it. BTreeMap keeps issue order
    /// stable.
    #[serde(default)]
    missing_licenses: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    bad_licenses: BTreeMap<String, Vec<String>>,
}

pub(crate) fn parse(text: &str, tool: &str) -> Result<Vec<Issue>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let output: LintOutput =
        serde_json::from_str(text).map_err(|source| ParseError::InvalidJson {
            context: "reuse lint --json document".to_string(),
            source,
        })?;
    let issues = &output.non_compliant;

    let mut out = Vec::new();

    for name in &issues.deprecated_licenses {
        out.push(
            Issue::new(tool, Severity::Error, "deprecated-license", format!("Deprecated license {name}"))
                .at(format!("{LICENSE_DIR}/{name}.txt"), None, None),
        );
    }

    for name in &issues.unused_licenses {
        out.push(
            Issue::new(tool, Severity::Error, "unused-license", format!("Unused license {name}"))
                .at(format!("{LICENSE_DIR}/{name}.txt"), None, None),
        );
    }

    for (name, files) in &issues.bad_licenses {
        let mut issue = Issue::new(tool, Severity::Error, "bad-license", format!("Bad license {name}"));
        issue.add_note(&format!("Referenced in {}", files.join(" ")));
        out.push(issue);
    }

    for (name, files) in &issues.missing_licenses {
        let mut issue = Issue::new(
            tool,
            Severity::Error,
            "missing-license",
            format!("Missing license {name}"),
        )
        .at(format!("{LICENSE_DIR}/{name}.txt"), None, None);
        issue.add_note(&format!("Referenced in {}", files.join(" ")));
        out.push(issue);
    }

    for file in &issues.missing_copyright_info {
        out.push(
            Issue::new(tool, Severity::Error, "no-copyright", "No SPDX copyright line")
                .at(file, None, None),
        );
    }

    for file in &issues.missing_licensing_info {
        out.push(
            Issue::new(tool, Severity::Error, "no-license", "No SPDX license line")
                .at(file, None, None),
        );
    }

    Ok(out)
}
