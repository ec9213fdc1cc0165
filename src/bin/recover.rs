//! redolog recovery binary
//!
//! Rebuilds the disk from a recovery log.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use redolog::{Config, RecoveryEngine, RecoveryLog, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Checkpoint-aware REDO recovery
#[derive(Parser, Debug)]
#[command(name = "redolog-recover")]
#[command(about = "Reconstruct the durable disk from a crash-truncated log")]
#[command(version)]
struct Args {
    /// Recovery log file (bootstrap line + log records)
    input: PathBuf,

    /// Recovered disk output file
    #[arg(short, long, default_value = "recovered_disk.txt")]
    output: PathBuf,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,redolog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    tracing::info!("redolog-recover v{}", redolog::VERSION);

    let config = Config::builder().disk_output_path(&args.output).build()?;

    let log = RecoveryLog::read(&args.input)?;
    tracing::info!(
        "Read {} records from {} ({} malformed lines ignored)",
        log.records.len(),
        args.input.display(),
        log.malformed
    );

    let outcome = RecoveryEngine::recover(&log);
    fs::write(&config.disk_output_path, outcome.render() + "\n")?;

    tracing::info!("Recovered disk written to {}", config.disk_output_path.display());
    Ok(())
}
