use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fully resolved orchestrator configuration.
///
/// Loaded from `caracal.toml` (all fields optional) plus environment
/// overrides; CLI skip/report selectors are merged in by the binary before
/// the config reaches the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    /// Global per-tool timeout. Individual tools can override it in
    /// `[tools.<name>]`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Worker-pool bound; defaults to the CPU count.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Source selectors, relative to the project root. Plain directories
    /// or glob patterns.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Tool names to remove from the run. Entries naming a category are
    /// treated as a category skip; unknown names produce a warning.
    #[serde(default)]
    pub disabled_tools: Vec<String>,

    /// Categories to remove wholesale.
    #[serde(default)]
    pub disabled_categories: Vec<String>,

    /// Emitters to run, by registry name.
    #[serde(default = "default_emitters")]
    pub emitters: Vec<String>,

    /// Minimum acceptable `totals.percent_covered`; below it the coverage
    /// normalizer emits a warning issue.
    #[serde(default)]
    pub coverage_floor: Option<f64>,

    #[serde(default)]
    pub tools: BTreeMap<String, ToolOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolOverride {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub advisory_exits: Option<Vec<i32>>,
}

fn default_report_dir() -> String {
    "reports".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_sources() -> Vec<String> {
    vec!["src".to_string(), "tests".to_string()]
}

fn default_emitters() -> Vec<String> {
    vec![
        "sarif".to_string(),
        "codequality".to_string(),
        "junit".to_string(),
        "cobertura".to_string(),
        "annotations".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            timeout_secs: default_timeout_secs(),
            workers: None,
            sources: default_sources(),
            disabled_tools: Vec::new(),
            disabled_categories: Vec::new(),
            emitters: default_emitters(),
            coverage_floor: None,
            tools: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn timeout_for(&self, tool: &str) -> Duration {
        let secs = self
            .tools
            .get(tool)
            .and_then(|t| t.timeout_secs)
            .unwrap_or(self.timeout_secs);
        Duration::from_secs(secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.report_dir, "reports");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.sources, vec!["src", "tests"]);
        assert_eq!(cfg.emitters.len(), 5);
    }

    #[test]
    fn per_tool_timeout_override() {
        let cfg: AppConfig = toml::from_str(
            r#"
            timeout_secs = 20

            [tools.pytest]
            timeout_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(cfg.timeout_for("pytest"), Duration::from_secs(600));
        assert_eq!(cfg.timeout_for("flake8"), Duration::from_secs(20));
    }
}
