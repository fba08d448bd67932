//! # Pitchcap Types
//!
//! Pure data structures shared across the capture pipeline and the offline
//! log reader:
//!
//! - Wire structures: the 8-byte sequenced unit header and the 2-byte inner
//!   message header ([`wire`])
//! - The 30-byte packed binary log record ([`record`])
//! - The packet-type and order-status tags stored in that record ([`tags`])
//! - The registry of known inner message types ([`message_types`])
//! - Feed and logging constants ([`config`])
//!
//! ## What This Crate Does NOT Contain
//!
//! - Validation and classification rules (belongs in `pitchcap-codec`)
//! - Socket management, queues, or file I/O (belongs in `services/`)
//!
//! All multi-byte integers on the wire and on disk are little-endian. The
//! structs here are built from `zerocopy::byteorder` little-endian fields so
//! the layout is identical on every host; nothing byteswaps by hand.

pub mod config;
pub mod message_types;
pub mod record;
pub mod tags;
pub mod wire;

pub use message_types::{lookup_message_type, message_type_name, MessageTypeInfo, MESSAGE_TYPES};
pub use record::BinaryLogRecord;
pub use tags::{order_status_name, packet_type_name, OrderStatus, PacketType};
pub use wire::{InnerMessageHeader, SequencedUnitHeader};
