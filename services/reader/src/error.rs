//! Reader errors. `Truncated` is the framing failure the on-disk contract
//! demands: no resync, no partial record delivery, exit non-zero.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error reading log: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended inside a record header or its declared payload.
    #[error("truncated record at offset {offset}: need {need} bytes, got {got}")]
    Truncated { offset: u64, need: usize, got: usize },
}
