//! Packet-type and order-status tags stored in the binary log record.
//!
//! Both enums are `#[repr(u8)]` and their discriminants are part of the
//! on-disk contract; the string forms match what the reader prints.

use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Four-way classification of a datagram by header shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum PacketType {
    Heartbeat = 0,
    Admin = 1,
    Unsequenced = 2,
    Data = 3,
}

impl PacketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketType::Heartbeat => "HEARTBEAT",
            PacketType::Admin => "ADMIN",
            PacketType::Unsequenced => "UNSEQUENCED",
            PacketType::Data => "DATA",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown packet type {0:?}: expected HEARTBEAT, ADMIN, UNSEQUENCED or DATA")]
pub struct ParsePacketTypeError(String);

impl FromStr for PacketType {
    type Err = ParsePacketTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HEARTBEAT" => Ok(PacketType::Heartbeat),
            "ADMIN" => Ok(PacketType::Admin),
            "UNSEQUENCED" => Ok(PacketType::Unsequenced),
            "DATA" => Ok(PacketType::Data),
            other => Err(ParsePacketTypeError(other.to_string())),
        }
    }
}

/// Six-way ordering classification assigned to each arrival by the
/// sequence manager.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum OrderStatus {
    Unsequenced = 0,
    SequencedFirst = 1,
    SequencedInOrder = 2,
    SequencedOutOfOrderLate = 3,
    SequencedOutOfOrderEarly = 4,
    SequencedDuplicate = 5,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unsequenced => "UNSEQUENCED",
            OrderStatus::SequencedFirst => "SEQUENCED-FIRST",
            OrderStatus::SequencedInOrder => "SEQUENCED-IN-ORDER",
            OrderStatus::SequencedOutOfOrderLate => "SEQUENCED-OUT-OF-ORDER-LATE",
            OrderStatus::SequencedOutOfOrderEarly => "SEQUENCED-OUT-OF-ORDER-EARLY",
            OrderStatus::SequencedDuplicate => "SEQUENCED-DUPLICATE",
        }
    }

    /// True for both out-of-order variants.
    pub fn is_out_of_order(&self) -> bool {
        matches!(
            self,
            OrderStatus::SequencedOutOfOrderEarly | OrderStatus::SequencedOutOfOrderLate
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printable name for a raw packet-type byte from a log record.
pub fn packet_type_name(tag: u8) -> &'static str {
    PacketType::try_from(tag).map_or("UNKNOWN", |t| t.as_str())
}

/// Printable name for a raw order-status byte from a log record.
pub fn order_status_name(tag: u8) -> &'static str {
    OrderStatus::try_from(tag).map_or("UNKNOWN", |s| s.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_u8() {
        for tag in [
            PacketType::Heartbeat,
            PacketType::Admin,
            PacketType::Unsequenced,
            PacketType::Data,
        ] {
            assert_eq!(PacketType::try_from(u8::from(tag)).unwrap(), tag);
        }
        for status in [
            OrderStatus::Unsequenced,
            OrderStatus::SequencedFirst,
            OrderStatus::SequencedInOrder,
            OrderStatus::SequencedOutOfOrderLate,
            OrderStatus::SequencedOutOfOrderEarly,
            OrderStatus::SequencedDuplicate,
        ] {
            assert_eq!(OrderStatus::try_from(u8::from(status)).unwrap(), status);
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert!(PacketType::try_from(4u8).is_err());
        assert!(OrderStatus::try_from(6u8).is_err());
        assert_eq!(packet_type_name(200), "UNKNOWN");
        assert_eq!(order_status_name(200), "UNKNOWN");
    }

    #[test]
    fn packet_type_parses_cli_names() {
        assert_eq!("DATA".parse::<PacketType>().unwrap(), PacketType::Data);
        assert!("data".parse::<PacketType>().is_err());
    }
}
