//! Per-datagram processing: validate, classify, label, persist.
//!
//! One instance lives on the capture thread. The hot path is a straight
//! line of statically-known calls; the only suspension point is the
//! writer's bounded queue.

use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use pitchcap_codec::{classify_packet, decode_unit_header, encode_record};
use pitchcap_types::config::MAX_STORED_PAYLOAD;
use pitchcap_types::{BinaryLogRecord, PacketType};
use tracing::warn;

use crate::config::CaptureConfig;
use crate::error::CaptureResult;
use crate::sequence::SequenceManager;
use crate::stats::CaptureStats;
use crate::writer::BinaryLogWriter;

pub struct PacketProcessor {
    writer: BinaryLogWriter,
    sequence_manager: SequenceManager,
    stats: CaptureStats,
    skip_heartbeats: bool,
    stats_interval: u64,
    flush_interval: u64,
}

impl PacketProcessor {
    pub fn new(writer: BinaryLogWriter, config: &CaptureConfig) -> Self {
        Self {
            writer,
            sequence_manager: SequenceManager::new(),
            stats: CaptureStats::new(),
            skip_heartbeats: config.skip_heartbeats,
            stats_interval: config.stats_interval,
            flush_interval: config.flush_interval,
        }
    }

    /// Handle one received datagram.
    ///
    /// Validation failures warn and return `Ok`; the capture loop moves on.
    /// An error from here means the writer is gone and capture must stop.
    pub fn process_packet(
        &mut self,
        packet_id: u32,
        port: u16,
        datagram: &[u8],
        src_ip: Ipv4Addr,
    ) -> CaptureResult<()> {
        self.stats.total_packets += 1;

        let header = match decode_unit_header(datagram) {
            Ok(header) => header,
            Err(err) => {
                warn!(packet_id, port, error = %err, "dropping invalid packet");
                self.stats.invalid_packets += 1;
                return Ok(());
            }
        };

        let sequence = header.sequence.get();
        let count = header.count;
        let unit = header.unit;

        let packet_type = classify_packet(sequence, count, datagram.len());
        if packet_type == PacketType::Heartbeat && self.skip_heartbeats {
            self.stats.heartbeats_skipped += 1;
            return Ok(());
        }
        self.stats.record_type(packet_type);

        let order_status = self
            .sequence_manager
            .determine_order_status(sequence, count, port, unit);
        self.stats.record_status(order_status);

        let stored = datagram.len().min(MAX_STORED_PAYLOAD);
        let record = BinaryLogRecord::new(
            timestamp_ns(),
            packet_id,
            sequence,
            src_ip,
            port,
            datagram.len() as u16,
            count,
            unit,
            packet_type,
            order_status,
            stored as u16,
        );
        self.writer.append(encode_record(&record, &datagram[..stored]))?;

        if self.stats.total_packets % self.stats_interval == 0 {
            self.stats.report();
        }
        if self.stats.total_packets % self.flush_interval == 0 {
            self.writer.flush()?;
        }
        Ok(())
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    pub fn sequence_manager(&self) -> &SequenceManager {
        &self.sequence_manager
    }

    /// Final report, flush and writer teardown.
    pub fn finish(self) -> CaptureResult<()> {
        self.stats.report();
        let flush_result = self.writer.flush();
        let shutdown_result = self.writer.shutdown();
        flush_result.and(shutdown_result)
    }
}

fn timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_nanos() as u64
}
