use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Keep the guard alive for the whole run so buffered log lines flush.
    let _guard = match &args.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("caracal.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    let exit = app::run(args).await?;
    drop(_guard);
    std::process::exit(exit);
}
