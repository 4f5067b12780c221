//! Result aggregation: merges RunResults into a Report whose ordering is
//! independent of completion order.

pub mod emit;

use crate::model::{Issue, OverallStatus, Report, RunResult, RunStatus, Severity, ORCHESTRATOR};

/// Build a Report from the scheduler's results.
///
/// Pure: identical inputs yield a byte-identical serialized Report no
/// matter what order `results` arrived in. Configuration warnings become a
/// synthetic orchestrator RunResult so no diagnostic is lost.
pub fn aggregate(
    mut results: Vec<RunResult>,
    config_warnings: Vec<Issue>,
    incomplete: bool,
    run_id: impl Into<String>,
    generated_at: impl Into<String>,
) -> Report {
    if !config_warnings.is_empty() {
        results.push(orchestrator_result(config_warnings));
    }

    results.sort_by(|a, b| a.tool.cmp(&b.tool));
    for result in &mut results {
        // Stable sort: normalizer insertion order breaks the remaining ties.
        result.issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    let status = overall_status(&results);

    Report {
        run_id: run_id.into(),
        generated_at: generated_at.into(),
        incomplete,
        status,
        results,
    }
}

fn overall_status(results: &[RunResult]) -> OverallStatus {
    let failed = results.iter().any(|result| {
        result.failed() || result.worst_severity() == Some(Severity::Error)
    });
    if failed {
        return OverallStatus::Failed;
    }

    let warned = results
        .iter()
        .any(|result| result.worst_severity() >= Some(Severity::Warning));
    if warned {
        OverallStatus::Warnings
    } else {
        OverallStatus::Passed
    }
}

fn orchestrator_result(issues: Vec<Issue>) -> RunResult {
    RunResult {
        tool: ORCHESTRATOR.to_string(),
        category: None,
        status: RunStatus::Completed { exit_code: 0 },
        duration_ms: 0,
        stdout: String::new(),
        stderr: String::new(),
        exit_ok: true,
        issues,
        coverage: None,
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::descriptor::Category;
    use crate::model::RunStatus;

    use super::*;

    fn result(tool: &str, exit_code: i32, exit_ok: bool, issues: Vec<Issue>) -> RunResult {
        RunResult {
            tool: tool.to_string(),
            category: Some(Category::Lint),
            status: RunStatus::Completed { exit_code },
            duration_ms: 10,
            stdout: String::new(),
            stderr: String::new(),
            exit_ok,
            issues,
            coverage: None,
        }
    }

    fn issue(tool: &str, severity: Severity, path: &str, line: u32) -> Issue {
        Issue::new(tool, severity, "X100", "problem").at(path, Some(line), None)
    }

    #[test]
    fn report_ordering_is_independent_of_completion_order() {
        let a = result("alpha", 0, true, vec![issue("alpha", Severity::Warning, "b.py", 2)]);
        let b = result("beta", 0, true, vec![issue("beta", Severity::Warning, "a.py", 9)]);
        let c = result("gamma", 0, true, vec![]);

        let forward = aggregate(
            vec![a.clone(), b.clone(), c.clone()],
            vec![],
            false,
            "run",
            "2026-01-01T00:00:00Z",
        );
        let backward = aggregate(vec![c, b, a], vec![], false, "run", "2026-01-01T00:00:00Z");

        assert_eq!(forward, backward);
        let order: Vec<&str> = forward.results.iter().map(|r| r.tool.as_str()).collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn issues_sort_by_path_line_column_code() {
        let mut unsorted = result("lint", 0, true, vec![]);
        unsorted.issues = vec![
            issue("lint", Severity::Warning, "z.py", 1),
            issue("lint", Severity::Warning, "a.py", 9),
            issue("lint", Severity::Warning, "a.py", 2),
            Issue::new("lint", Severity::Warning, "A001", "project wide"),
        ];

        let report = aggregate(vec![unsorted], vec![], false, "run", "t");
        let locations: Vec<String> =
            report.results[0].issues.iter().map(|i| i.location()).collect();
        assert_eq!(locations, vec!["[project]", "a.py:2", "a.py:9", "z.py:1"]);
    }

    #[test]
    fn status_derivation() {
        let clean = aggregate(
            vec![result("a", 0, true, vec![])],
            vec![],
            false,
            "run",
            "t",
        );
        assert_eq!(clean.status, OverallStatus::Passed);

        let warned = aggregate(
            vec![result("a", 0, true, vec![issue("a", Severity::Warning, "x.py", 1)])],
            vec![],
            false,
            "run",
            "t",
        );
        assert_eq!(warned.status, OverallStatus::Warnings);

        let note_only = aggregate(
            vec![result("a", 0, true, vec![issue("a", Severity::Note, "x.py", 1)])],
            vec![],
            false,
            "run",
            "t",
        );
        assert_eq!(note_only.status, OverallStatus::Passed);

        let errored = aggregate(
            vec![result("a", 0, true, vec![issue("a", Severity::Error, "x.py", 1)])],
            vec![],
            false,
            "run",
            "t",
        );
        assert_eq!(errored.status, OverallStatus::Failed);

        let bad_exit = aggregate(vec![result("a", 2, false, vec![])], vec![], false, "run", "t");
        assert_eq!(bad_exit.status, OverallStatus::Failed);
    }

    #[test]
    fn config_warnings_become_an_orchestrator_result() {
        let warning = Issue::orchestrator(Severity::Warning, "unknown-tool", "no such tool 'x'");
        let report = aggregate(
            vec![result("zeta", 0, true, vec![])],
            vec![warning],
            false,
            "run",
            "t",
        );

        let order: Vec<&str> = report.results.iter().map(|r| r.tool.as_str()).collect();
        assert_eq!(order, vec![ORCHESTRATOR, "zeta"]);
        assert_eq!(report.status, OverallStatus::Warnings);
    }

    #[test]
    fn timeout_fails_the_report() {
        let mut timed_out = result("slow", 0, false, vec![]);
        timed_out.status = RunStatus::TimedOut;
        let report = aggregate(vec![timed_out], vec![], false, "run", "t");
        assert_eq!(report.status, OverallStatus::Failed);
    }
}
