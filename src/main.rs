use clap::Parser;
use log_tailer::{SessionConfig, run_session};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Tail a rotating log file for a fixed time, copying new bytes into
/// result_<rotation>_<file name> files beside it.
#[derive(Parser, Debug)]
#[command(name = "log-tailer", version, about)]
struct Cli {
    /// Absolute path of the log file to tail
    #[arg(short = 'F', long)]
    filepath: PathBuf,

    /// Total session time in seconds
    #[arg(short = 'D', long, default_value_t = 0)]
    duration: u64,

    /// Seconds between polls
    #[arg(short = 'I', long, default_value_t = 10)]
    interval: u64,

    /// Megabytes consumed after which a quiet file is treated as rotated
    #[arg(short = 'S', long, default_value_t = 1)]
    max_size: u64,

    /// Consecutive polls without new bytes after which the file is treated as rotated
    #[arg(short = 'R', long, default_value_t = 5)]
    max_retry: u64,

    /// Also treat a file that shrank below the read offset as rotated
    #[arg(long)]
    detect_truncation: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(&self.filepath)
            .with_duration(Duration::from_secs(self.duration))
            .with_poll_interval(Duration::from_secs(self.interval))
            .with_size_ceiling_mb(self.max_size)
            .with_stale_ceiling(self.max_retry)
            .with_truncation_detection(self.detect_truncation)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    if let Err(e) = run_session(cli.session_config()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
