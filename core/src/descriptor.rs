//! Static description of a wrapped tool: what to run and how to read it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What kind of checking a tool performs. Used for category-level skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Format,
    Lint,
    TypeCheck,
    Security,
    Copyright,
    Test,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Format,
        Category::Lint,
        Category::TypeCheck,
        Category::Security,
        Category::Copyright,
        Category::Test,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Format => "format",
            Category::Lint => "lint",
            Category::TypeCheck => "type-check",
            Category::Security => "security",
            Category::Copyright => "copyright",
            Category::Test => "test",
        }
    }

    /// Case-insensitive lookup, accepting both `type-check` and `typecheck`.
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == name || c.as_str().replace('-', "") == name)
    }
}

/// Declared shape of a tool's captured output. A closed set: each variant
/// is paired with exactly one normalizer, selected by match at dispatch
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    PylintText,
    MypyText,
    PydocstyleText,
    BanditText,
    UnifiedDiff,
    RuffJsonLines,
    ReuseJson,
    PytestText,
    CoverageJson,
}

/// Argument placeholder expanded to one argument per configured source path.
pub const SOURCES_PLACEHOLDER: &str = "{sources}";
/// Argument placeholder expanded to the project root.
pub const ROOT_PLACEHOLDER: &str = "{root}";
/// Env-value placeholder expanded to the source paths joined with the
/// platform path separator (MYPYPATH and friends).
pub const SOURCES_PATHSEP_PLACEHOLDER: &str = "{sources_pathsep}";

/// A fully resolved invocation, ready to hand to the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: PathBuf,
}

/// Immutable description of one tool in the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub category: Category,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub output: OutputFormat,
    pub enabled_by_default: bool,
    /// Non-zero exit codes that do not fail the run (e.g. "issues found").
    pub advisory_exits: Vec<i32>,
}

impl ToolDescriptor {
    pub fn new(
        name: &str,
        category: Category,
        program: &str,
        args: &[&str],
        output: OutputFormat,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: Vec::new(),
            output,
            enabled_by_default: true,
            advisory_exits: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_advisory_exits(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.advisory_exits = codes.into_iter().collect();
        self
    }

    pub fn exit_ok(&self, code: i32) -> bool {
        code == 0 || self.advisory_exits.contains(&code)
    }

    /// Expand the command template against the project root and the
    /// configured source paths.
    pub fn command(&self, root: &Path, sources: &[PathBuf]) -> LaunchSpec {
        let mut args = Vec::with_capacity(self.args.len() + sources.len());
        for arg in &self.args {
            if arg == SOURCES_PLACEHOLDER {
                args.extend(sources.iter().map(|p| p.display().to_string()));
            } else if arg == ROOT_PLACEHOLDER {
                args.push(root.display().to_string());
            } else {
                args.push(arg.clone());
            }
        }

        let pathsep = if cfg!(windows) { ";" } else { ":" };
        let joined = sources
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(pathsep);

        let env = self
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.replace(SOURCES_PATHSEP_PLACEHOLDER, &joined)))
            .collect();

        LaunchSpec {
            program: self.program.clone(),
            args,
            env,
            cwd: root.to_path_buf(),
        }
    }
}
