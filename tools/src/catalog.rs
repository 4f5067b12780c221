//! The static tool catalogue. Hard-coded and ordered; the configuration
//! merge filters it down to the effective set.

use caracal_core::descriptor::{
    Category, OutputFormat, ToolDescriptor, SOURCES_PATHSEP_PLACEHOLDER, SOURCES_PLACEHOLDER,
};

/// Every tool caracal knows how to run, in canonical order.
///
/// Format-category tools are pinned to their check/diff modes; caracal
/// never rewrites sources.
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "reuse",
            Category::Copyright,
            "reuse",
            &["lint", "--json"],
            OutputFormat::ReuseJson,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "ruff",
            Category::Lint,
            "ruff",
            &[
                "check",
                "--output-format=json-lines",
                SOURCES_PLACEHOLDER,
            ],
            OutputFormat::RuffJsonLines,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "isort",
            Category::Format,
            "isort",
            &["--diff", "--check", "--quiet", SOURCES_PLACEHOLDER],
            OutputFormat::UnifiedDiff,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "black",
            Category::Format,
            "black",
            &["--diff", "--check", "--no-color", "--quiet", SOURCES_PLACEHOLDER],
            OutputFormat::UnifiedDiff,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "mypy",
            Category::TypeCheck,
            "mypy",
            &["--strict", "--explicit-package-bases", SOURCES_PLACEHOLDER],
            OutputFormat::MypyText,
        )
        // mypy resolves namespace packages through MYPYPATH rather than the
        // stock import engine.
        .with_env("MYPYPATH", SOURCES_PATHSEP_PLACEHOLDER)
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "flake8",
            Category::Lint,
            "flake8",
            &[SOURCES_PLACEHOLDER],
            OutputFormat::PylintText,
        )
        .with_advisory_exits([1]),
        // pylint's exit status is a bit-mask of message classes.
        ToolDescriptor::new(
            "pylint",
            Category::Lint,
            "pylint",
            &[SOURCES_PLACEHOLDER],
            OutputFormat::PylintText,
        )
        .with_advisory_exits(1..32),
        ToolDescriptor::new(
            "pydocstyle",
            Category::Lint,
            "pydocstyle",
            &[SOURCES_PLACEHOLDER],
            OutputFormat::PydocstyleText,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "bandit",
            Category::Security,
            "bandit",
            &["-c", "pyproject.toml", "-r", SOURCES_PLACEHOLDER],
            OutputFormat::BanditText,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "pytest",
            Category::Test,
            "pytest",
            &["-q", "--color=no"],
            OutputFormat::PytestText,
        )
        .with_advisory_exits([1]),
        ToolDescriptor::new(
            "coverage",
            Category::Test,
            "coverage",
            &["json", "-q", "-o", "-"],
            OutputFormat::CoverageJson,
        )
        .with_advisory_exits([2]),
    ]
}
