//! # Pitchcap Capture Service
//!
//! ## Purpose
//!
//! Capture a sequenced-unit multicast feed from two UDP groups and persist
//! every datagram into a compact rotating binary log, at a rate of millions
//! of records per run:
//!
//! - [`network`]: multicast sockets and the single-threaded capture loop
//! - [`processor`]: the per-datagram pipeline (validate → classify →
//!   sequence-label → persist)
//! - [`sequence`]: per-(port, unit) ordering state
//! - [`writer`]: the bounded-queue asynchronous rotating log writer
//! - [`stats`]: capture counters and the periodic performance report
//! - [`config`]: TOML-overridable configuration
//!
//! ## Threading model
//!
//! One capture thread owns the sockets, the sequence trackers and the
//! statistics; N writer threads own the segment files. The bounded queue
//! between them is the only cross-thread resource, and back-pressure is the
//! overflow policy: a full queue blocks capture rather than dropping.
//!
//! Shutdown is cooperative: a signal handler flips one atomic flag, the
//! capture loop observes it within a poll timeout, drains what it already
//! read, closes the queue, and the writers flush and exit.

pub mod config;
pub mod error;
pub mod network;
pub mod processor;
pub mod sequence;
pub mod stats;
pub mod writer;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::info;

pub use config::CaptureConfig;
pub use error::{CaptureError, CaptureResult};
pub use network::NetworkHandler;
pub use processor::PacketProcessor;
pub use sequence::{SequenceManager, SequenceTracker};
pub use stats::CaptureStats;
pub use writer::BinaryLogWriter;

/// Run the whole pipeline until shutdown or writer failure.
///
/// A final flush and writer teardown is attempted even when the capture
/// loop exits with an error, so accepted records reach disk.
pub fn run(config: CaptureConfig, shutdown: Arc<AtomicBool>) -> CaptureResult<()> {
    config.validate()?;

    let writer = BinaryLogWriter::open(&config)?;
    let mut processor = PacketProcessor::new(writer, &config);
    let mut network = NetworkHandler::bind(&config, shutdown)?;

    let capture_result = network.run(&mut processor);

    info!("flushing remaining log data");
    let finish_result = processor.finish();
    capture_result.and(finish_result)
}
