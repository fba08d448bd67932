//! Capture service configuration.
//!
//! `CaptureConfig::default()` is the production setup; a TOML file given on
//! the command line overrides any subset of fields. Validation happens once
//! at startup, before sockets or files are touched.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use pitchcap_types::config as defaults;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Multicast group both sockets join.
    pub group: Ipv4Addr,
    /// Feed ports to bind and monitor.
    pub ports: Vec<u16>,
    /// Requested kernel receive buffer per socket.
    pub socket_recv_buffer: usize,
    /// Poll timeout in milliseconds; bounds shutdown latency.
    pub poll_timeout_ms: u64,

    /// Directory the segment set lives in.
    pub log_dir: PathBuf,
    /// Current-segment file name.
    pub log_base_name: String,
    /// Rotation threshold per segment, bytes.
    pub log_file_size: u64,
    /// Maximum retained segments, current included.
    pub log_file_count: usize,
    /// Writer queue capacity; a full queue blocks the capture thread.
    pub queue_size: usize,
    /// Background writer threads.
    pub writer_threads: usize,

    /// Drop heartbeats before logging and sequence tracking.
    pub skip_heartbeats: bool,
    /// Performance report cadence, in packets.
    pub stats_interval: u64,
    /// Writer flush cadence, in packets.
    pub flush_interval: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            group: defaults::MULTICAST_GROUP
                .parse()
                .unwrap_or(Ipv4Addr::new(233, 218, 133, 80)),
            ports: vec![defaults::PORT1, defaults::PORT2],
            socket_recv_buffer: defaults::SOCKET_RECV_BUFFER,
            poll_timeout_ms: defaults::POLL_TIMEOUT_MS,
            log_dir: PathBuf::from("."),
            log_base_name: defaults::LOG_BASE_NAME.to_string(),
            log_file_size: defaults::LOG_FILE_SIZE,
            log_file_count: defaults::LOG_FILE_COUNT,
            queue_size: defaults::ASYNC_QUEUE_SIZE,
            writer_threads: defaults::WRITER_THREADS,
            skip_heartbeats: false,
            stats_interval: defaults::STATS_INTERVAL,
            flush_interval: defaults::FLUSH_INTERVAL,
        }
    }
}

impl CaptureConfig {
    pub fn from_file(path: &Path) -> CaptureResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CaptureError::io(format!("reading config {}", path.display()), e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> CaptureResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CaptureError::Config(format!("config parse failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CaptureResult<()> {
        if self.ports.is_empty() {
            return Err(CaptureError::Config("at least one feed port required".into()));
        }
        if self.writer_threads == 0 {
            return Err(CaptureError::Config("writer_threads must be at least 1".into()));
        }
        if self.queue_size == 0 {
            return Err(CaptureError::Config("queue_size must be at least 1".into()));
        }
        if self.log_file_count == 0 {
            return Err(CaptureError::Config("log_file_count must be at least 1".into()));
        }
        if self.log_file_size < 64 {
            return Err(CaptureError::Config(
                "log_file_size too small to hold a single record".into(),
            ));
        }
        if self.stats_interval == 0 || self.flush_interval == 0 {
            return Err(CaptureError::Config(
                "stats_interval and flush_interval must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Path of the current segment.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_base_name)
    }
}
