//! Binary log record framing.
//!
//! A log segment is back-to-back `(BinaryLogRecord, payload)` entries with
//! no separators; `payload_length` is the only framing information. The
//! writer encodes each entry into one contiguous buffer before it is
//! enqueued so the background workers write exactly one buffer per record.

use pitchcap_types::BinaryLogRecord;
use zerocopy::{AsBytes, FromBytes};

use crate::error::{CodecError, CodecResult};

/// Encode one log entry: the 30-byte record followed by its payload.
///
/// `payload` must already be truncated to `record.payload_length` bytes;
/// the clamp against the stored-payload limit is the writer's job because
/// only it knows the full datagram.
pub fn encode_record(record: &BinaryLogRecord, payload: &[u8]) -> Vec<u8> {
    debug_assert_eq!(payload.len(), record.payload_length.get() as usize);
    let mut entry = Vec::with_capacity(BinaryLogRecord::SIZE + payload.len());
    entry.extend_from_slice(record.as_bytes());
    entry.extend_from_slice(payload);
    entry
}

/// Decode one log entry from the front of `buf`.
///
/// Returns the record, a borrowed view of its payload, and the total entry
/// size, or [`CodecError::Truncated`] if `buf` ends inside the record
/// header or inside the declared payload. `offset` is only used to report
/// where in the stream the truncation happened.
pub fn decode_record(buf: &[u8], offset: u64) -> CodecResult<(BinaryLogRecord, &[u8], usize)> {
    if buf.len() < BinaryLogRecord::SIZE {
        return Err(CodecError::Truncated {
            offset,
            need: BinaryLogRecord::SIZE,
            got: buf.len(),
        });
    }

    let record = BinaryLogRecord::read_from(&buf[..BinaryLogRecord::SIZE]).ok_or(
        CodecError::Truncated {
            offset,
            need: BinaryLogRecord::SIZE,
            got: buf.len(),
        },
    )?;

    let payload_len = record.payload_length.get() as usize;
    let total = BinaryLogRecord::SIZE + payload_len;
    if buf.len() < total {
        return Err(CodecError::Truncated {
            offset: offset + BinaryLogRecord::SIZE as u64,
            need: payload_len,
            got: buf.len() - BinaryLogRecord::SIZE,
        });
    }

    Ok((record, &buf[BinaryLogRecord::SIZE..total], total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchcap_types::{OrderStatus, PacketType};
    use std::net::Ipv4Addr;

    fn sample_record(payload_len: u16) -> BinaryLogRecord {
        BinaryLogRecord::new(
            1_700_000_000_123_456_789,
            42,
            1000,
            Ipv4Addr::new(233, 218, 133, 80),
            30501,
            300,
            5,
            2,
            PacketType::Data,
            OrderStatus::SequencedInOrder,
            payload_len,
        )
    }

    #[test]
    fn round_trips_every_payload_length() {
        for payload_len in 0..=256usize {
            let payload: Vec<u8> = (0..payload_len).map(|i| i as u8).collect();
            let record = sample_record(payload_len as u16);
            let entry = encode_record(&record, &payload);
            assert_eq!(entry.len(), BinaryLogRecord::SIZE + payload_len);

            let (decoded, decoded_payload, total) = decode_record(&entry, 0).unwrap();
            assert_eq!(total, entry.len());
            assert_eq!(decoded.as_bytes(), record.as_bytes());
            assert_eq!(decoded_payload, &payload[..]);
        }
    }

    #[test]
    fn truncated_header_is_an_error() {
        let entry = encode_record(&sample_record(4), &[1, 2, 3, 4]);
        for cut in 0..BinaryLogRecord::SIZE {
            let err = decode_record(&entry[..cut], 0).unwrap_err();
            assert!(matches!(err, CodecError::Truncated { .. }), "cut={cut}");
        }
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let entry = encode_record(&sample_record(4), &[1, 2, 3, 4]);
        for cut in BinaryLogRecord::SIZE..entry.len() {
            let err = decode_record(&entry[..cut], 0).unwrap_err();
            assert!(matches!(err, CodecError::Truncated { .. }), "cut={cut}");
        }
        assert!(decode_record(&entry, 0).is_ok());
    }
}
