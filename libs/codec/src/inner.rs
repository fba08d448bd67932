//! Bounded walk over the inner messages of a stored payload.
//!
//! A payload in the log is a copy of the datagram: unit header first, then
//! `count` inner messages, each prefixed by a 2-byte header. The walk starts
//! past the unit header and advances by each message's declared length.
//!
//! Stored payloads are truncated at 256 bytes and the feed itself can carry
//! malformed lengths, so the iterator stops rather than erroring: on fewer
//! than 2 remaining bytes, on a zero length, on a length that would overrun
//! the payload, and after a hard cap of 100 messages. A length of 1 is
//! nonsense per the format (the header alone is 2 bytes) but the walk
//! advances by it anyway rather than inventing a framing rule; the cap
//! bounds the damage.

use pitchcap_types::config::INNER_MESSAGE_CAP;
use pitchcap_types::{InnerMessageHeader, SequencedUnitHeader};
use zerocopy::FromBytes;

/// One inner message yielded by [`InnerMessageIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerMessage {
    /// Byte offset of the message header within the payload.
    pub offset: usize,
    pub header: InnerMessageHeader,
}

/// Iterator over the inner message headers of one stored payload.
pub struct InnerMessageIter<'a> {
    payload: &'a [u8],
    offset: usize,
    emitted: usize,
}

impl<'a> InnerMessageIter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: SequencedUnitHeader::SIZE,
            emitted: 0,
        }
    }
}

impl Iterator for InnerMessageIter<'_> {
    type Item = InnerMessage;

    fn next(&mut self) -> Option<InnerMessage> {
        if self.emitted >= INNER_MESSAGE_CAP {
            return None;
        }
        if self.offset + InnerMessageHeader::SIZE > self.payload.len() {
            return None;
        }

        let header = InnerMessageHeader::read_from(
            &self.payload[self.offset..self.offset + InnerMessageHeader::SIZE],
        )?;
        if header.length == 0 || self.offset + header.length as usize > self.payload.len() {
            return None;
        }

        let message = InnerMessage {
            offset: self.offset,
            header,
        };
        self.offset += header.length as usize;
        self.emitted += 1;
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchcap_types::wire::SequencedUnitHeader;
    use zerocopy::AsBytes;

    fn payload_with_messages(messages: &[(u8, u8)]) -> Vec<u8> {
        let body_len: usize = messages.iter().map(|(len, _)| *len as usize).sum();
        let header = SequencedUnitHeader::new(
            (SequencedUnitHeader::SIZE + body_len) as u16,
            messages.len() as u8,
            1,
            100,
        );
        let mut buf = header.as_bytes().to_vec();
        for &(len, msg_type) in messages {
            buf.push(len);
            buf.push(msg_type);
            buf.resize(buf.len() + len.saturating_sub(2) as usize, 0xAA);
        }
        buf
    }

    #[test]
    fn walks_all_messages() {
        let buf = payload_with_messages(&[(34, 0x37), (18, 0x3C), (42, 0x3D)]);
        let types: Vec<u8> = InnerMessageIter::new(&buf)
            .map(|m| m.header.message_type)
            .collect();
        assert_eq!(types, vec![0x37, 0x3C, 0x3D]);
    }

    #[test]
    fn reports_offsets_past_unit_header() {
        let buf = payload_with_messages(&[(10, 0x39), (10, 0x3A)]);
        let offsets: Vec<usize> = InnerMessageIter::new(&buf).map(|m| m.offset).collect();
        assert_eq!(offsets, vec![8, 18]);
    }

    #[test]
    fn empty_and_header_only_payloads_yield_nothing() {
        assert_eq!(InnerMessageIter::new(&[]).count(), 0);
        let buf = payload_with_messages(&[]);
        assert_eq!(InnerMessageIter::new(&buf).count(), 0);
    }

    #[test]
    fn stops_on_zero_length() {
        let mut buf = payload_with_messages(&[(10, 0x39)]);
        buf.extend_from_slice(&[0, 0x3D, 0, 0]);
        assert_eq!(InnerMessageIter::new(&buf).count(), 1);
    }

    #[test]
    fn stops_when_length_overruns_payload() {
        let mut buf = payload_with_messages(&[(10, 0x39)]);
        // Declared 42 bytes but only the 2-byte header remains.
        buf.extend_from_slice(&[42, 0x3D]);
        assert_eq!(InnerMessageIter::new(&buf).count(), 1);
    }

    #[test]
    fn caps_at_one_hundred_messages() {
        // 150 two-byte messages; only the first 100 are walked.
        let messages: Vec<(u8, u8)> = (0..150).map(|_| (2u8, 0x2Du8)).collect();
        let buf = payload_with_messages(&messages);
        assert_eq!(InnerMessageIter::new(&buf).count(), INNER_MESSAGE_CAP);
    }
}
