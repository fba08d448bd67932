//! Capture-side statistics and the periodic performance report.
//!
//! Counters are owned and updated by the capture thread alone; the report
//! is printed from the same thread, so nothing here is atomic. If a
//! separate reporter thread is ever introduced these must become atomics.

use std::time::Instant;

use pitchcap_types::{OrderStatus, PacketType};
use tracing::{info, warn};

/// Throughput floor for the report warning, packets per second.
const PPS_WARN_THRESHOLD: f64 = 50_000.0;

/// Volume below which the throughput warning stays quiet.
const PPS_WARN_MIN_PACKETS: u64 = 100_000;

#[derive(Debug)]
pub struct CaptureStats {
    pub total_packets: u64,
    pub invalid_packets: u64,
    pub heartbeats_skipped: u64,
    pub data_packets: u64,
    pub admin_packets: u64,
    pub unsequenced_packets: u64,
    pub out_of_order_packets: u64,
    pub duplicate_packets: u64,
    start: Instant,
}

impl CaptureStats {
    pub fn new() -> Self {
        Self {
            total_packets: 0,
            invalid_packets: 0,
            heartbeats_skipped: 0,
            data_packets: 0,
            admin_packets: 0,
            unsequenced_packets: 0,
            duplicate_packets: 0,
            out_of_order_packets: 0,
            start: Instant::now(),
        }
    }

    pub fn record_type(&mut self, packet_type: PacketType) {
        match packet_type {
            PacketType::Data => self.data_packets += 1,
            PacketType::Admin => self.admin_packets += 1,
            PacketType::Unsequenced => self.unsequenced_packets += 1,
            // Heartbeats are only counted when skipped; logged heartbeats
            // show up in the reader's distribution instead.
            PacketType::Heartbeat => {}
        }
    }

    pub fn record_status(&mut self, status: OrderStatus) {
        if status.is_out_of_order() {
            self.out_of_order_packets += 1;
        } else if status == OrderStatus::SequencedDuplicate {
            self.duplicate_packets += 1;
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn packets_per_second(&self) -> f64 {
        let elapsed = self.elapsed_seconds();
        if elapsed > 0.0 {
            self.total_packets as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Emit the performance report line.
    pub fn report(&self) {
        let pps = self.packets_per_second();
        info!(
            total = self.total_packets,
            pps = pps as u64,
            elapsed_s = self.elapsed_seconds(),
            heartbeats_skipped = self.heartbeats_skipped,
            out_of_order = self.out_of_order_packets,
            duplicates = self.duplicate_packets,
            invalid = self.invalid_packets,
            "capture performance"
        );
        if pps < PPS_WARN_THRESHOLD && self.total_packets > PPS_WARN_MIN_PACKETS {
            warn!(pps = pps as u64, "throughput below 50k pps target");
        }
    }
}

impl Default for CaptureStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_by_kind() {
        let mut stats = CaptureStats::new();
        stats.record_type(PacketType::Data);
        stats.record_type(PacketType::Data);
        stats.record_type(PacketType::Admin);
        stats.record_type(PacketType::Unsequenced);
        stats.record_type(PacketType::Heartbeat);
        assert_eq!(stats.data_packets, 2);
        assert_eq!(stats.admin_packets, 1);
        assert_eq!(stats.unsequenced_packets, 1);

        stats.record_status(OrderStatus::SequencedOutOfOrderEarly);
        stats.record_status(OrderStatus::SequencedOutOfOrderLate);
        stats.record_status(OrderStatus::SequencedDuplicate);
        stats.record_status(OrderStatus::SequencedInOrder);
        assert_eq!(stats.out_of_order_packets, 2);
        assert_eq!(stats.duplicate_packets, 1);
    }
}
