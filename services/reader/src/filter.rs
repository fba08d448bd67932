//! Record filters, combined by conjunction.

use pitchcap_types::{BinaryLogRecord, PacketType};

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Keep records with sequence >= this.
    pub seq_start: Option<u32>,
    /// Keep records with sequence <= this.
    pub seq_end: Option<u32>,
    /// Keep records captured on this port.
    pub port: Option<u16>,
    /// Keep records of this packet type.
    pub packet_type: Option<PacketType>,
}

impl RecordFilter {
    pub fn matches(&self, record: &BinaryLogRecord) -> bool {
        if let Some(port) = self.port {
            if record.port.get() != port {
                return false;
            }
        }
        if let Some(packet_type) = self.packet_type {
            if record.packet_type != u8::from(packet_type) {
                return false;
            }
        }
        if let Some(start) = self.seq_start {
            if record.sequence.get() < start {
                return false;
            }
        }
        if let Some(end) = self.seq_end {
            if record.sequence.get() > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchcap_types::OrderStatus;
    use std::net::Ipv4Addr;

    fn record(sequence: u32, port: u16, packet_type: PacketType) -> BinaryLogRecord {
        BinaryLogRecord::new(
            0,
            1,
            sequence,
            Ipv4Addr::LOCALHOST,
            port,
            8,
            0,
            1,
            packet_type,
            OrderStatus::Unsequenced,
            0,
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RecordFilter::default();
        assert!(filter.matches(&record(0, 30501, PacketType::Heartbeat)));
        assert!(filter.matches(&record(9999, 30502, PacketType::Data)));
    }

    #[test]
    fn filters_combine_by_conjunction() {
        let filter = RecordFilter {
            seq_start: Some(100),
            seq_end: Some(200),
            port: Some(30501),
            packet_type: Some(PacketType::Data),
        };
        assert!(filter.matches(&record(150, 30501, PacketType::Data)));
        assert!(!filter.matches(&record(99, 30501, PacketType::Data)));
        assert!(!filter.matches(&record(201, 30501, PacketType::Data)));
        assert!(!filter.matches(&record(150, 30502, PacketType::Data)));
        assert!(!filter.matches(&record(150, 30501, PacketType::Admin)));
    }

    #[test]
    fn sequence_bounds_are_inclusive() {
        let filter = RecordFilter {
            seq_start: Some(100),
            seq_end: Some(200),
            ..RecordFilter::default()
        };
        assert!(filter.matches(&record(100, 30501, PacketType::Data)));
        assert!(filter.matches(&record(200, 30501, PacketType::Data)));
    }
}
