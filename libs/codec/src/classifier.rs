//! Packet classification.

use pitchcap_types::PacketType;

/// Classify a datagram from its decoded header fields.
///
/// `wire_len` is the datagram length as received, not the header's declared
/// length. Total over all inputs:
///
/// - sequence 0, count 0, ≤20 bytes → heartbeat
/// - sequence 0, count 0, >20 bytes → administrative unit
/// - sequence 0, count >0           → unsequenced data
/// - sequence >0                    → sequenced data
pub fn classify_packet(sequence: u32, count: u8, wire_len: usize) -> PacketType {
    if sequence == 0 {
        if count == 0 && wire_len <= 20 {
            PacketType::Heartbeat
        } else if count == 0 {
            PacketType::Admin
        } else {
            PacketType::Unsequenced
        }
    } else {
        PacketType::Data
    }
}
