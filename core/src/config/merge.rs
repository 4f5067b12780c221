//! Combines the static catalogue with user overrides into the effective,
//! ordered list of tools to run.

use std::collections::HashSet;

use crate::descriptor::{Category, ToolDescriptor};
use crate::model::{Issue, Severity};

use super::types::AppConfig;

/// Ordered tool list after disables and skips, plus any configuration
/// warnings raised while resolving the overrides.
#[derive(Debug, Clone, Default)]
pub struct EffectiveToolSet {
    pub tools: Vec<ToolDescriptor>,
    pub warnings: Vec<Issue>,
}

/// Resolve the effective tool set.
///
/// Catalogue order is preserved regardless of override order. Unknown
/// names are configuration warnings, never fatal: orchestration proceeds
/// with the remaining valid overrides.
pub fn effective_tools(catalogue: &[ToolDescriptor], cfg: &AppConfig) -> EffectiveToolSet {
    let known: HashSet<String> = catalogue
        .iter()
        .map(|tool| tool.name.to_ascii_lowercase())
        .collect();

    let mut warnings = Vec::new();
    let mut disabled_tools: HashSet<String> = HashSet::new();
    let mut disabled_categories: HashSet<Category> = HashSet::new();

    // The disable list accepts both tool and category names; config-file
    // and CLI entries arrive merged.
    for entry in &cfg.disabled_tools {
        let name = entry.trim().to_ascii_lowercase();
        if known.contains(&name) {
            disabled_tools.insert(name);
        } else if let Some(category) = Category::parse(&name) {
            disabled_categories.insert(category);
        } else {
            warnings.push(Issue::orchestrator(
                Severity::Warning,
                "unknown-tool",
                format!("disable list names unknown tool or category '{entry}'"),
            ));
        }
    }

    for entry in &cfg.disabled_categories {
        match Category::parse(entry) {
            Some(category) => {
                disabled_categories.insert(category);
            }
            None => warnings.push(Issue::orchestrator(
                Severity::Warning,
                "unknown-category",
                format!("skip list names unknown category '{entry}'"),
            )),
        }
    }

    for name in cfg.tools.keys() {
        if !known.contains(&name.to_ascii_lowercase()) {
            warnings.push(Issue::orchestrator(
                Severity::Warning,
                "unknown-tool",
                format!("[tools.{name}] does not match any catalogue tool"),
            ));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut tools = Vec::new();

    for descriptor in catalogue {
        if !seen.insert(descriptor.name.as_str()) {
            continue;
        }
        if disabled_categories.contains(&descriptor.category) {
            continue;
        }
        if disabled_tools.contains(&descriptor.name.to_ascii_lowercase()) {
            continue;
        }

        let tool_override = cfg.tools.get(&descriptor.name);
        let enabled = tool_override
            .and_then(|t| t.enabled)
            .unwrap_or(descriptor.enabled_by_default);
        if !enabled {
            continue;
        }

        let mut descriptor = descriptor.clone();
        if let Some(advisory) = tool_override.and_then(|t| t.advisory_exits.clone()) {
            descriptor.advisory_exits = advisory;
        }
        tools.push(descriptor);
    }

    EffectiveToolSet { tools, warnings }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::descriptor::OutputFormat;

    use super::*;

    fn catalogue() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new("black", Category::Format, "black", &[], OutputFormat::UnifiedDiff),
            ToolDescriptor::new("flake8", Category::Lint, "flake8", &[], OutputFormat::PylintText),
            ToolDescriptor::new("mypy", Category::TypeCheck, "mypy", &[], OutputFormat::MypyText),
        ]
    }

    fn names(set: &EffectiveToolSet) -> Vec<&str> {
        set.tools.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn no_overrides_keeps_catalogue_order() {
        let set = effective_tools(&catalogue(), &AppConfig::default());
        assert_eq!(names(&set), vec!["black", "flake8", "mypy"]);
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn disabling_a_tool_removes_it_entirely() {
        let cfg = AppConfig {
            disabled_tools: vec!["Flake8".to_string()],
            ..AppConfig::default()
        };
        let set = effective_tools(&catalogue(), &cfg);
        assert_eq!(names(&set), vec!["black", "mypy"]);
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn category_entry_in_disable_list_skips_the_category() {
        let cfg = AppConfig {
            disabled_tools: vec!["format".to_string()],
            ..AppConfig::default()
        };
        let set = effective_tools(&catalogue(), &cfg);
        assert_eq!(names(&set), vec!["flake8", "mypy"]);
    }

    #[test]
    fn unknown_names_warn_but_do_not_abort() {
        let cfg = AppConfig {
            disabled_tools: vec!["clippy".to_string(), "mypy".to_string()],
            disabled_categories: vec!["style".to_string()],
            ..AppConfig::default()
        };
        let set = effective_tools(&catalogue(), &cfg);
        assert_eq!(names(&set), vec!["black", "flake8"]);
        assert_eq!(set.warnings.len(), 2);
        assert!(set.warnings.iter().all(|w| w.severity == Severity::Warning));
    }

    #[test]
    fn advisory_exits_override_applies() {
        let mut cfg = AppConfig::default();
        cfg.tools.insert(
            "flake8".to_string(),
            crate::config::ToolOverride {
                advisory_exits: Some(vec![1, 2]),
                ..Default::default()
            },
        );
        let set = effective_tools(&catalogue(), &cfg);
        let flake8 = set.tools.iter().find(|t| t.name == "flake8").unwrap();
        assert!(flake8.exit_ok(2));
    }

    #[test]
    fn per_tool_enabled_override() {
        let mut cfg = AppConfig::default();
        cfg.tools.insert(
            "mypy".to_string(),
            crate::config::ToolOverride {
                enabled: Some(false),
                ..Default::default()
            },
        );
        let set = effective_tools(&catalogue(), &cfg);
        assert_eq!(names(&set), vec!["black", "flake8"]);
    }
}
