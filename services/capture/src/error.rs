//! Capture pipeline errors.
//!
//! Invalid datagrams never surface here; the processor warns and keeps
//! going. What does surface is fatal to the pipeline: startup I/O failures,
//! a writer that exhausted its retry budget, or a queue torn down mid-run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// Socket or filesystem failure, fatal at startup.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The writer gave up on the current segment after its retry budget.
    /// Anything still queued may not reach disk; the capture loop must
    /// stop rather than keep accepting datagrams it cannot persist.
    #[error("binary log writer failed; see prior write errors")]
    WriterFailed,

    /// The writer queue is closed. Expected during shutdown; an error only
    /// if seen while capture is still running.
    #[error("binary log writer queue is closed")]
    QueueClosed,

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CaptureError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CaptureError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;
