//! Single-pass statistics over a log scan.
//!
//! Aggregates counts by packet type, order status, port, unit and inner
//! message type, plus timestamp and sequence extremes. Sequence 0 is the
//! sentinel for unsequenced units and is excluded from the sequence range.

use std::collections::BTreeMap;

use pitchcap_codec::InnerMessageIter;
use pitchcap_types::{
    message_type_name, order_status_name, packet_type_name, BinaryLogRecord, OrderStatus,
};

use crate::display::format_timestamp;

#[derive(Debug, Default)]
pub struct LogStatistics {
    pub total_records: u64,
    pub packet_type_counts: BTreeMap<u8, u64>,
    pub order_status_counts: BTreeMap<u8, u64>,
    pub port_counts: BTreeMap<u16, u64>,
    pub unit_counts: BTreeMap<u8, u64>,
    pub message_type_counts: BTreeMap<u8, u64>,
    pub min_timestamp: Option<u64>,
    pub max_timestamp: Option<u64>,
    pub min_sequence: Option<u32>,
    pub max_sequence: Option<u32>,
    pub out_of_order_count: u64,
    pub duplicate_count: u64,
}

impl LogStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, record: &BinaryLogRecord, payload: &[u8]) {
        self.total_records += 1;
        *self.packet_type_counts.entry(record.packet_type).or_default() += 1;
        *self.order_status_counts.entry(record.order_status).or_default() += 1;
        *self.port_counts.entry(record.port.get()).or_default() += 1;
        *self.unit_counts.entry(record.unit).or_default() += 1;

        let timestamp = record.timestamp_ns.get();
        self.min_timestamp = Some(self.min_timestamp.map_or(timestamp, |t| t.min(timestamp)));
        self.max_timestamp = Some(self.max_timestamp.map_or(timestamp, |t| t.max(timestamp)));

        let sequence = record.sequence.get();
        if sequence > 0 {
            self.min_sequence = Some(self.min_sequence.map_or(sequence, |s| s.min(sequence)));
            self.max_sequence = Some(self.max_sequence.map_or(sequence, |s| s.max(sequence)));
        }

        match record.order_status() {
            Some(status) if status.is_out_of_order() => self.out_of_order_count += 1,
            Some(OrderStatus::SequencedDuplicate) => self.duplicate_count += 1,
            _ => {}
        }

        for message in InnerMessageIter::new(payload) {
            *self
                .message_type_counts
                .entry(message.header.message_type)
                .or_default() += 1;
        }
    }

    pub fn print_summary(&self) {
        println!("\n=== BINARY LOG ANALYSIS SUMMARY ===");
        println!("Total Records: {}", self.total_records);

        if let (Some(min), Some(max)) = (self.min_timestamp, self.max_timestamp) {
            println!(
                "Time Range: {} to {}",
                format_timestamp(min),
                format_timestamp(max)
            );
            let duration_seconds = (max - min) as f64 / 1e9;
            println!("Duration: {duration_seconds:.3} seconds");
            if duration_seconds > 0.0 {
                println!(
                    "Average Rate: {:.1} packets/second",
                    self.total_records as f64 / duration_seconds
                );
            }
        }

        if let (Some(min), Some(max)) = (self.min_sequence, self.max_sequence) {
            println!("Sequence Range: {min} to {max}");
        }

        println!("\nPacket Type Distribution:");
        for (&tag, &count) in &self.packet_type_counts {
            println!(
                "  {}: {} ({:.2}%)",
                packet_type_name(tag),
                count,
                self.percentage(count)
            );
        }

        println!("\nOrder Status Distribution:");
        for (&tag, &count) in &self.order_status_counts {
            println!(
                "  {}: {} ({:.2}%)",
                order_status_name(tag),
                count,
                self.percentage(count)
            );
        }

        println!("\nPort Distribution:");
        for (&port, &count) in &self.port_counts {
            println!("  Port {}: {} ({:.2}%)", port, count, self.percentage(count));
        }

        if !self.message_type_counts.is_empty() {
            println!("\nTop Message Types:");
            let mut sorted: Vec<(u64, u8)> = self
                .message_type_counts
                .iter()
                .map(|(&msg_type, &count)| (count, msg_type))
                .collect();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            for (count, msg_type) in sorted.into_iter().take(10) {
                println!(
                    "  0x{msg_type:02x} ({}): {count}",
                    message_type_name(msg_type)
                );
            }
        }

        if self.out_of_order_count > 0 || self.duplicate_count > 0 {
            println!("\nSequencing Issues:");
            println!("  Out-of-order packets: {}", self.out_of_order_count);
            println!("  Duplicate packets: {}", self.duplicate_count);
        }
    }

    fn percentage(&self, count: u64) -> f64 {
        if self.total_records > 0 {
            count as f64 / self.total_records as f64 * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchcap_types::{OrderStatus, PacketType};
    use std::net::Ipv4Addr;

    fn record(
        sequence: u32,
        port: u16,
        unit: u8,
        packet_type: PacketType,
        order_status: OrderStatus,
        timestamp: u64,
    ) -> BinaryLogRecord {
        BinaryLogRecord::new(
            timestamp,
            1,
            sequence,
            Ipv4Addr::LOCALHOST,
            port,
            8,
            0,
            unit,
            packet_type,
            order_status,
            0,
        )
    }

    #[test]
    fn aggregates_counts_and_extremes() {
        let mut stats = LogStatistics::new();
        stats.update(
            &record(100, 30501, 1, PacketType::Data, OrderStatus::SequencedFirst, 50),
            &[],
        );
        stats.update(
            &record(105, 30502, 2, PacketType::Data, OrderStatus::SequencedOutOfOrderEarly, 90),
            &[],
        );
        stats.update(
            &record(101, 30501, 1, PacketType::Data, OrderStatus::SequencedDuplicate, 70),
            &[],
        );

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.port_counts[&30501], 2);
        assert_eq!(stats.unit_counts[&2], 1);
        assert_eq!(stats.min_timestamp, Some(50));
        assert_eq!(stats.max_timestamp, Some(90));
        assert_eq!(stats.min_sequence, Some(100));
        assert_eq!(stats.max_sequence, Some(105));
        assert_eq!(stats.out_of_order_count, 1);
        assert_eq!(stats.duplicate_count, 1);
    }

    #[test]
    fn sequence_zero_is_excluded_from_range() {
        let mut stats = LogStatistics::new();
        stats.update(
            &record(0, 30501, 1, PacketType::Heartbeat, OrderStatus::Unsequenced, 10),
            &[],
        );
        assert_eq!(stats.min_sequence, None);
        assert_eq!(stats.max_sequence, None);

        stats.update(
            &record(7, 30501, 1, PacketType::Data, OrderStatus::SequencedFirst, 20),
            &[],
        );
        assert_eq!(stats.min_sequence, Some(7));
        assert_eq!(stats.max_sequence, Some(7));
    }

    #[test]
    fn counts_inner_message_types_from_payload() {
        // unit header copy + two messages
        let mut payload = vec![0u8; 8];
        payload.extend_from_slice(&[4, 0x37, 0, 0]);
        payload.extend_from_slice(&[2, 0x3D]);

        let mut stats = LogStatistics::new();
        stats.update(
            &record(1, 30501, 1, PacketType::Data, OrderStatus::SequencedFirst, 10),
            &payload,
        );
        assert_eq!(stats.message_type_counts[&0x37], 1);
        assert_eq!(stats.message_type_counts[&0x3D], 1);
    }
}
