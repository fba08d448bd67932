//! The binary log record: the fixed 30-byte header written for every
//! captured datagram.
//!
//! ```text
//! ┌───────────────────┬──────────────────────────────┐
//! │ BinaryLogRecord   │ payload                      │
//! │ (30 bytes)        │ (payload_length bytes, ≤256) │
//! └───────────────────┴──────────────────────────────┘
//! ```
//!
//! Records are written back-to-back with no framing, no checksum and no file
//! header; readers frame the stream using `payload_length` alone. Every
//! field is little-endian on disk via `zerocopy::byteorder` types, so the
//! struct is alignment-1 and exactly 30 bytes with zero padding. DO NOT
//! REORDER fields: the layout is the on-disk contract.

use std::net::Ipv4Addr;

use zerocopy::byteorder::{LittleEndian, U16, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::tags::{OrderStatus, PacketType};

/// Fixed header of one log entry (30 bytes, packed, little-endian).
#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct BinaryLogRecord {
    /// Capture wall-clock, nanoseconds since the Unix epoch, taken at
    /// enqueue time rather than write time.
    pub timestamp_ns: U64<LittleEndian>,
    /// Monotonic capture-local id, assigned by the capture thread starting
    /// at 1. Canonical ingest order.
    pub packet_id: U32<LittleEndian>,
    /// The unit header's sequence field.
    pub sequence: U32<LittleEndian>,
    /// Raw source IPv4 octets in network order.
    pub src_ip: [u8; 4],
    /// Destination port the datagram arrived on.
    pub port: U16<LittleEndian>,
    /// Datagram length as received on the wire. May exceed
    /// `payload_length`; the log stores at most 256 payload bytes.
    pub length: U16<LittleEndian>,
    /// Unit header `count`.
    pub count: u8,
    /// Unit header `unit`.
    pub unit: u8,
    /// [`PacketType`] tag.
    pub packet_type: u8,
    /// [`OrderStatus`] tag.
    pub order_status: u8,
    /// Payload bytes following this header: `min(length, 256)`.
    pub payload_length: U16<LittleEndian>,
}

// The on-disk contract: exactly 30 bytes, no padding.
const _: () = assert!(std::mem::size_of::<BinaryLogRecord>() == 30);

impl BinaryLogRecord {
    /// Record header size in bytes.
    pub const SIZE: usize = 30;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp_ns: u64,
        packet_id: u32,
        sequence: u32,
        src_ip: Ipv4Addr,
        port: u16,
        length: u16,
        count: u8,
        unit: u8,
        packet_type: PacketType,
        order_status: OrderStatus,
        payload_length: u16,
    ) -> Self {
        Self {
            timestamp_ns: U64::new(timestamp_ns),
            packet_id: U32::new(packet_id),
            sequence: U32::new(sequence),
            src_ip: src_ip.octets(),
            port: U16::new(port),
            length: U16::new(length),
            count,
            unit,
            packet_type: packet_type.into(),
            order_status: order_status.into(),
            payload_length: U16::new(payload_length),
        }
    }

    /// Source address as an [`Ipv4Addr`].
    pub fn src_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.src_ip)
    }

    /// Decoded packet-type tag, if the stored byte is a known tag.
    pub fn packet_type(&self) -> Option<PacketType> {
        PacketType::try_from(self.packet_type).ok()
    }

    /// Decoded order-status tag, if the stored byte is a known tag.
    pub fn order_status(&self) -> Option<OrderStatus> {
        OrderStatus::try_from(self.order_status).ok()
    }
}
