//! Per-(port, unit) sequence tracking.
//!
//! Each unit on each port is an independent sequenced stream. The manager
//! owns one tracker per stream and labels every arrival with an
//! [`OrderStatus`]. It is accessed only from the capture thread, so there
//! is no locking anywhere in here.

use std::collections::BTreeSet;

use pitchcap_types::OrderStatus;
use rustc_hash::FxHashMap;

/// Sequence state for one (port, unit) stream.
///
/// Invariants after every arrival: `highest_seen_seq >= last_confirmed_seq`,
/// and every pending entry is strictly greater than `last_confirmed_seq + 1`
/// (an entry equal to it would have been absorbed immediately).
#[derive(Debug, Default, Clone)]
pub struct SequenceTracker {
    /// Highest sequence confirmed contiguously from the start of stream.
    pub last_confirmed_seq: u32,
    /// Highest sequence observed at all, contiguous or not.
    pub highest_seen_seq: u32,
    /// Sequences that arrived early and are not yet contiguous.
    pub pending: BTreeSet<u32>,
}

/// Owns all trackers and assigns an order status per datagram.
#[derive(Debug, Default)]
pub struct SequenceManager {
    trackers: FxHashMap<(u16, u8), SequenceTracker>,
}

impl SequenceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label one arrival and update the stream's tracker.
    ///
    /// A `count` of zero still occupies a single sequence slot. Sequence
    /// numbers near `u32::MAX` clamp the span to one message: upstream
    /// feeds reset before the sequence space is exhausted, so wrap-around
    /// is not modeled as a first-class event.
    pub fn determine_order_status(
        &mut self,
        seq: u32,
        count: u8,
        port: u16,
        unit: u8,
    ) -> OrderStatus {
        if seq == 0 {
            return OrderStatus::Unsequenced;
        }

        let mut span = u32::from(count.max(1));
        if seq > u32::MAX - span + 1 {
            span = 1;
        }

        let tracker = self.trackers.entry((port, unit)).or_default();

        // First sight of this stream.
        if tracker.last_confirmed_seq == 0 && tracker.highest_seen_seq == 0 {
            tracker.last_confirmed_seq = seq + span - 1;
            tracker.highest_seen_seq = seq + span - 1;
            return OrderStatus::SequencedFirst;
        }

        let expected = match tracker.last_confirmed_seq.checked_add(1) {
            Some(expected) => expected,
            // Sequence space exhausted; everything at or below the
            // confirmed point is a replay.
            None => return OrderStatus::SequencedDuplicate,
        };

        if seq == expected {
            tracker.last_confirmed_seq = seq + span - 1;
            // Absorb the contiguous run of pending sequences this arrival
            // just connected to.
            loop {
                let Some(next) = tracker.last_confirmed_seq.checked_add(1) else {
                    break;
                };
                if !tracker.pending.remove(&next) {
                    break;
                }
                tracker.last_confirmed_seq = next;
            }
            tracker.highest_seen_seq = tracker.highest_seen_seq.max(tracker.last_confirmed_seq);
            OrderStatus::SequencedInOrder
        } else if seq < expected {
            if seq <= tracker.last_confirmed_seq {
                OrderStatus::SequencedDuplicate
            } else {
                // Falls in the gap below the expected point. Late arrivals
                // land in an already-closed window: label only, no state
                // change and no pending lookup.
                OrderStatus::SequencedOutOfOrderLate
            }
        } else {
            for s in seq..=seq + span - 1 {
                tracker.pending.insert(s);
            }
            tracker.highest_seen_seq = tracker.highest_seen_seq.max(seq + span - 1);
            OrderStatus::SequencedOutOfOrderEarly
        }
    }

    /// Tracker for one stream, if any arrival has been seen.
    pub fn tracker(&self, port: u16, unit: u8) -> Option<&SequenceTracker> {
        self.trackers.get(&(port, unit))
    }

    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    pub fn clear(&mut self) {
        self.trackers.clear();
    }
}
