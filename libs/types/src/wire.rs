//! Wire structures: the sequenced unit header and the inner message header.
//!
//! Every datagram on the feed starts with an 8-byte sequenced unit header:
//!
//! ```text
//! ┌──────────────────┬───────────────────────────────────────┐
//! │ SequencedUnit    │ inner messages                        │
//! │ Header (8 bytes) │ (count × [InnerMessageHeader + body]) │
//! └──────────────────┴───────────────────────────────────────┘
//! ```
//!
//! Field ordering matches the exchange format exactly; every field is either
//! a single byte or a `zerocopy::byteorder` little-endian integer, so the
//! structs have alignment 1 and no padding on any host.

use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Sequenced unit header (8 bytes), the fixed prefix on every datagram.
#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct SequencedUnitHeader {
    /// Total length of this unit in bytes, header included.
    pub length: U16<LittleEndian>,
    /// Number of inner messages carried by the unit.
    pub count: u8,
    /// Logical substream id; sequences are tracked per unit.
    pub unit: u8,
    /// Sequence of the first inner message; 0 means the unit carries no
    /// sequence point.
    pub sequence: U32<LittleEndian>,
}

impl SequencedUnitHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 8;

    pub fn new(length: u16, count: u8, unit: u8, sequence: u32) -> Self {
        Self {
            length: U16::new(length),
            count,
            unit,
            sequence: U32::new(sequence),
        }
    }
}

/// Inner message header (2 bytes) at the start of each message in a unit.
///
/// Only the header is material to the capture pipeline; message bodies are
/// opaque bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct InnerMessageHeader {
    /// Total bytes of the message, this header included.
    pub length: u8,
    /// Message type identifier.
    pub message_type: u8,
}

impl InnerMessageHeader {
    pub const SIZE: usize = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_header_layout() {
        assert_eq!(std::mem::size_of::<SequencedUnitHeader>(), SequencedUnitHeader::SIZE);
        assert_eq!(std::mem::align_of::<SequencedUnitHeader>(), 1);
    }

    #[test]
    fn unit_header_byte_order() {
        let header = SequencedUnitHeader::new(0x0102, 3, 4, 0x0506_0708);
        let bytes = header.as_bytes();
        // length and sequence little-endian, count/unit single bytes
        assert_eq!(bytes, &[0x02, 0x01, 3, 4, 0x08, 0x07, 0x06, 0x05]);
    }

    #[test]
    fn unit_header_reads_back() {
        let raw = [0x2a, 0x00, 0x03, 0x02, 0x64, 0x00, 0x00, 0x00];
        let header = SequencedUnitHeader::read_from(&raw[..]).unwrap();
        assert_eq!(header.length.get(), 42);
        assert_eq!(header.count, 3);
        assert_eq!(header.unit, 2);
        assert_eq!(header.sequence.get(), 100);
    }

    #[test]
    fn inner_header_layout() {
        assert_eq!(std::mem::size_of::<InnerMessageHeader>(), InnerMessageHeader::SIZE);
        let header = InnerMessageHeader::read_from(&[0x22u8, 0x37][..]).unwrap();
        assert_eq!(header.length, 34);
        assert_eq!(header.message_type, 0x37);
    }
}
