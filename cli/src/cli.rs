use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "caracal",
    version,
    about = "Run code-quality tools against a codebase and emit CI reports"
)]
pub struct Args {
    /// Project root. Defaults to the current directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Config file. Defaults to <root>/caracal.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tool or category names to skip, in addition to the configured
    /// disables. Repeatable.
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,

    /// Tool or category names to disable. Same effect as --skip; mirrors
    /// the config key.
    #[arg(long = "disable", value_name = "NAME")]
    pub disable: Vec<String>,

    /// Report formats to emit, overriding the configured list. Repeatable.
    #[arg(long = "report", value_name = "FORMAT")]
    pub report: Vec<String>,

    /// Global per-tool timeout override, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Worker pool size. Defaults to the CPU count.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Also write tracing output to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// List the tool catalogue and exit.
    #[arg(long)]
    pub list_tools: bool,
}
