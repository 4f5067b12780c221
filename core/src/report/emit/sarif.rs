//! SARIF 2.1.0, the generic static-analysis import format. One run per
//! tool so viewers attribute results correctly.

use serde::Serialize;

use crate::errors::EmitError;
use crate::model::{Report, RunResult, RunStatus, Severity};

#[derive(Serialize)]
struct Sarif {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<Run>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Run {
    tool: Tool,
    invocations: Vec<Invocation>,
    results: Vec<ResultEntry>,
}

#[derive(Serialize)]
struct Tool {
    driver: Driver,
}

#[derive(Serialize)]
struct Driver {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Invocation {
    execution_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultEntry {
    rule_id: String,
    level: &'static str,
    message: Message,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<Location>,
}

#[derive(Serialize)]
struct Message {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    physical_location: PhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocation {
    artifact_location: ArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<Region>,
}

#[derive(Serialize)]
struct ArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Region {
    start_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_column: Option<u32>,
}

pub fn emit(report: &Report) -> Result<String, EmitError> {
    let runs = report.results.iter().map(|result| run_entry(result, report)).collect();

    let sarif = Sarif {
        schema: "https://json.schemastore.org/sarif-2.1.0.json",
        version: "2.1.0",
        runs,
    };

    let mut text = serde_json::to_string_pretty(&sarif).map_err(|source| EmitError::Serialize {
        emitter: "sarif",
        source,
    })?;
    text.push('\n');
    Ok(text)
}

fn run_entry(result: &RunResult, report: &Report) -> Run {
    let exit_code = match result.status {
        RunStatus::Completed { exit_code } => Some(exit_code),
        _ => None,
    };
    // A cancelled run marks every invocation unsuccessful so consumers see
    // the report is incomplete.
    let execution_successful = !result.failed() && !report.incomplete;

    let results = result
        .issues
        .iter()
        .map(|issue| ResultEntry {
            rule_id: issue.code.clone(),
            level: level_name(issue.severity),
            message: Message {
                text: match &issue.note {
                    Some(note) => format!("{}\n{}", issue.message, note),
                    None => issue.message.clone(),
                },
            },
            locations: issue
                .path
                .as_ref()
                .map(|path| {
                    vec![Location {
                        physical_location: PhysicalLocation {
                            artifact_location: ArtifactLocation {
                                uri: path.display().to_string(),
                            },
                            region: issue.line.map(|start_line| Region {
                                start_line,
                                start_column: issue.column,
                            }),
                        },
                    }]
                })
                .unwrap_or_default(),
        })
        .collect();

    Run {
        tool: Tool {
            driver: Driver {
                name: result.tool.clone(),
            },
        },
        invocations: vec![Invocation {
            execution_successful,
            exit_code,
        }],
        results,
    }
}

fn level_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note | Severity::Info => "note",
    }
}
