//! Transmission outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a message was not acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NackReason {
    /// Unicast node record missing or disabled
    NodeDeactivated,

    /// Every attempt of a packet was lost
    PacketLoss,

    /// Region pool could not carry the transmission
    ChannelCapacityExceeded,

    /// Node pool could not carry the transmission
    NodeCapacityExceeded,
}

impl fmt::Display for NackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NackReason::NodeDeactivated => "node_deactivated",
            NackReason::PacketLoss => "packet_loss",
            NackReason::ChannelCapacityExceeded => "channel_capacity_exceeded",
            NackReason::NodeCapacityExceeded => "node_capacity_exceeded",
        };
        f.write_str(name)
    }
}

/// Terminal state of one transmission
///
/// Reasons are kept in the order they were detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reasons", rename_all = "snake_case")]
pub enum TransmissionStatus {
    /// Never reserved capacity, nothing to release
    Dropped(Vec<NackReason>),

    /// Occupied the channel but was not delivered
    SentUnacknowledged(Vec<NackReason>),

    /// Delivered
    SentAcknowledged,
}

/// What the engine decided for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionResult {
    pub start_time_ns: i64,
    pub end_time_ns: i64,

    /// Bandwidth held until the release fires (0 when dropped)
    pub reserved_bps: i64,

    pub status: TransmissionStatus,
}

impl TransmissionResult {
    pub(crate) fn dropped(start_time_ns: i64, end_time_ns: i64, reasons: Vec<NackReason>) -> Self {
        Self {
            start_time_ns,
            end_time_ns,
            reserved_bps: 0,
            status: TransmissionStatus::Dropped(reasons),
        }
    }

    /// Capacity was reserved and must be released later
    pub fn is_processed(&self) -> bool {
        !matches!(self.status, TransmissionStatus::Dropped(_))
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self.status, TransmissionStatus::SentAcknowledged)
    }

    /// Reasons in detection order (empty when acknowledged)
    pub fn nack_reasons(&self) -> &[NackReason] {
        match &self.status {
            TransmissionStatus::Dropped(reasons) | TransmissionStatus::SentUnacknowledged(reasons) => {
                reasons
            }
            TransmissionStatus::SentAcknowledged => &[],
        }
    }

    pub fn duration_ns(&self) -> i64 {
        self.end_time_ns - self.start_time_ns
    }
}

/// Per-outcome counters kept by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Every message handed to the engine
    pub processed_messages: u64,
    pub dropped: u64,
    pub unacknowledged: u64,
    pub acknowledged: u64,
}

impl EngineStats {
    pub(crate) fn record(&mut self, result: &TransmissionResult) {
        self.processed_messages += 1;
        match result.status {
            TransmissionStatus::Dropped(_) => self.dropped += 1,
            TransmissionStatus::SentUnacknowledged(_) => self.unacknowledged += 1,
            TransmissionStatus::SentAcknowledged => self.acknowledged += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags() {
        let dropped = TransmissionResult::dropped(5, 5, vec![NackReason::NodeDeactivated]);
        assert!(!dropped.is_processed());
        assert!(!dropped.is_acknowledged());
        assert_eq!(dropped.reserved_bps, 0);
        assert_eq!(dropped.nack_reasons(), &[NackReason::NodeDeactivated]);

        let lost = TransmissionResult {
            start_time_ns: 0,
            end_time_ns: 10,
            reserved_bps: 100,
            status: TransmissionStatus::SentUnacknowledged(vec![NackReason::PacketLoss]),
        };
        assert!(lost.is_processed());
        assert!(!lost.is_acknowledged());
        assert_eq!(lost.duration_ns(), 10);
    }

    #[test]
    fn test_status_serializes_tagged() {
        let status = TransmissionStatus::Dropped(vec![
            NackReason::ChannelCapacityExceeded,
            NackReason::NodeCapacityExceeded,
        ]);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "dropped");
        assert_eq!(json["reasons"][1], "NodeCapacityExceeded");
    }
}
