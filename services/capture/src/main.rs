//! High-volume feed capture binary.
//!
//! Usage:
//!   pitchcap
//!   pitchcap --config capture.toml --log-dir /data/captures
//!   pitchcap --skip-heartbeats --log-level debug

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pitchcap_capture::CaptureConfig;
use pitchcap_types::BinaryLogRecord;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pitchcap")]
#[command(about = "Multicast feed capture with rotating binary packet log")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the binary log segment set
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Drop heartbeat packets instead of logging them
    #[arg(long)]
    skip_heartbeats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => CaptureConfig::from_file(path)?,
        None => CaptureConfig::default(),
    };
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    if args.skip_heartbeats {
        config.skip_heartbeats = true;
    }
    config.validate()?;

    print_startup_info(&config);

    // The handler only flips the flag; all cleanup runs on the main
    // thread after the capture loop returns.
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    pitchcap_capture::run(config, shutdown)?;

    info!("shutdown complete");
    Ok(())
}

fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();
}

fn print_startup_info(config: &CaptureConfig) {
    info!("pitchcap high-volume feed capture");
    info!(group = %config.group, ports = ?config.ports, "feed");
    info!(
        record_bytes = BinaryLogRecord::SIZE,
        segment_mb = config.log_file_size / (1024 * 1024),
        segments = config.log_file_count,
        total_gb = config.log_file_size * config.log_file_count as u64 / (1024 * 1024 * 1024),
        "binary log"
    );
    info!(
        queue = config.queue_size,
        writer_threads = config.writer_threads,
        socket_buffer_mb = config.socket_recv_buffer / (1024 * 1024),
        skip_heartbeats = config.skip_heartbeats,
        "performance"
    );
    info!(
        stats_every = config.stats_interval,
        flush_every = config.flush_interval,
        "reporting"
    );
    info!("press Ctrl+C to stop capture and print final statistics");
}
