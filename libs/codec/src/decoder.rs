//! Unit-header decoding and datagram validation.
//!
//! The decoder is the entry point for every received datagram. It is pure
//! and allocation-free: a zerocopy view of the first 8 bytes, then three
//! sanity checks on the declared length. Anything that fails here is
//! dropped by the capture loop with a warning; nothing downstream sees it.

use pitchcap_types::config::{LENGTH_TOLERANCE, MAX_BUF};
use pitchcap_types::SequencedUnitHeader;
use zerocopy::FromBytes;

use crate::error::{CodecError, CodecResult};

/// Decode and validate the sequenced unit header at the front of `buf`.
///
/// `buf` is the datagram exactly as received. Validation accepts a header
/// iff the buffer holds at least 8 bytes and the declared length is
/// non-zero, at most [`MAX_BUF`], and no more than [`LENGTH_TOLERANCE`]
/// bytes beyond what was actually received. The tolerance exists because
/// the on-wire length may count bytes the receiver elected not to deliver;
/// this is a plausibility check, not an equality.
pub fn decode_unit_header(buf: &[u8]) -> CodecResult<SequencedUnitHeader> {
    if buf.len() < SequencedUnitHeader::SIZE {
        return Err(CodecError::PacketTooSmall {
            need: SequencedUnitHeader::SIZE,
            got: buf.len(),
        });
    }

    // Infallible after the length check; the header type is unaligned.
    let header = SequencedUnitHeader::read_from_prefix(buf).ok_or(CodecError::PacketTooSmall {
        need: SequencedUnitHeader::SIZE,
        got: buf.len(),
    })?;

    let declared = header.length.get();
    if declared == 0 || declared as usize > MAX_BUF {
        return Err(CodecError::LengthOutOfRange {
            declared,
            max: MAX_BUF,
        });
    }

    if declared as usize > buf.len() + LENGTH_TOLERANCE {
        return Err(CodecError::LengthMismatch {
            declared,
            received: buf.len(),
            tolerance: LENGTH_TOLERANCE,
        });
    }

    Ok(header)
}
