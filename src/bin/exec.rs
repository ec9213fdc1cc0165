//! redolog execution binary
//!
//! Runs a transaction program and writes its WAL.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use redolog::{parse_program, Config, Engine, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Round-robin transaction executor
#[derive(Parser, Debug)]
#[command(name = "redolog-exec")]
#[command(about = "Execute a transaction program and emit its write-ahead log")]
#[command(version)]
struct Args {
    /// Transaction program file
    input: PathBuf,

    /// Round-robin quantum (commands per transaction per round)
    quantum: usize,

    /// WAL output file
    #[arg(short, long, default_value = "execution.log")]
    wal: PathBuf,

    /// Keep only the first N WAL records in the crash image
    #[arg(long, requires = "crash_image")]
    crash_after: Option<usize>,

    /// Write a recovery-format crash image to this file
    #[arg(long)]
    crash_image: Option<PathBuf>,
}

fn main() {
    // Initialize tracing/logging
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
    tracing::info!("redolog-exec v{}", redolog::VERSION);
    tracing::info!("Program: {}", args.input.display());

    let mut builder = Config::builder().quantum(args.quantum).wal_path(&args.wal);
    if let Some(path) = &args.crash_image {
        builder = builder.crash_image_path(path);
    }
    if let Some(records) = args.crash_after {
        builder = builder.crash_after(records);
    }
    let config = builder.build()?;

    let text = fs::read_to_string(&args.input)?;
    let program = parse_program(&text)?;

    let mut engine = Engine::open(&config)?;
    // An I/O or setup failure leaves nothing worth imaging.
    let outcome = match engine.run(&program) {
        Err(e) if !e.is_crash() => return Err(e),
        outcome => outcome,
    };

    if let Some(path) = &config.crash_image_path {
        let retained = config.crash_after.unwrap_or(engine.wal().len());
        let image = engine.wal().crash_image(retained, &program.disk);
        fs::write(path, image.render())?;
        tracing::info!(
            "Crash image with {} of {} records written to {}",
            image.records.len(),
            engine.wal().len(),
            path.display()
        );
    }

    let report = outcome?;
    tracing::info!(
        "WAL written to {} ({} records, {} commands)",
        config.wal_path.display(),
        report.wal_records,
        report.commands_executed
    );

    Ok(())
}
