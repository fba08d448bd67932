//! Codec errors.
//!
//! Two kinds live here: `InvalidPacket` (a datagram failed unit-header
//! validation; the capture loop warns and drops it) and `Truncated` (a log
//! stream ended mid-record; fatal to the read). Each variant carries the
//! numbers needed to state what was expected and what was seen.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Datagram shorter than the 8-byte unit header.
    #[error("invalid packet: need {need} bytes for unit header, got {got}")]
    PacketTooSmall { need: usize, got: usize },

    /// Declared unit length of zero or above the receive buffer bound.
    #[error("invalid packet: declared length {declared} outside 1..={max}")]
    LengthOutOfRange { declared: u16, max: usize },

    /// Declared unit length exceeds the bytes actually received by more
    /// than the tolerance.
    #[error(
        "invalid packet: declared length {declared} exceeds received {received} by more than {tolerance}"
    )]
    LengthMismatch {
        declared: u16,
        received: usize,
        tolerance: usize,
    },

    /// A record header or its declared payload ran past end of stream.
    #[error("truncated record at offset {offset}: need {need} bytes, got {got}")]
    Truncated { offset: u64, need: usize, got: usize },
}

impl CodecError {
    /// True for the unit-header validation failures the capture loop
    /// drops and continues past; false for `Truncated`, which is fatal
    /// to a read.
    pub fn is_invalid_packet(&self) -> bool {
        !matches!(self, CodecError::Truncated { .. })
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
