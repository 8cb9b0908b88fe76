//! Bigsby Shell Binary
//!
//! Opens a store and drives it through the interactive shell on stdin.

use std::io;

use bigsby::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Bigsby key-value store
#[derive(Parser, Debug)]
#[command(name = "bigsby")]
#[command(about = "Persistent LSM-tree key-value store")]
#[command(version)]
struct Args {
    /// Directory to store data
    #[arg(long, default_value = "./.bigsby")]
    data_dir: String,

    /// Memtable size limit in bytes before flush
    #[arg(long, default_value = "1000")]
    compaction_limit: usize,

    /// Segments a level may hold before compaction
    #[arg(long, default_value = "4")]
    level_max_segments: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("Bigsby v{}", bigsby::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .compaction_limit(args.compaction_limit)
        .level_max_segments(args.level_max_segments)
        .build();

    let mut engine = match Engine::open(config) {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("Failed to open store: {err}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    if let Err(err) = bigsby::repl::run(&mut engine, &mut input, &mut out) {
        tracing::error!("Shell error: {err}");
        std::process::exit(1);
    }
}
