//! Outbound events produced by the direction modules
//!
//! All three are plain data so a host can queue them, ship them across a
//! process boundary, or replay them.
//!
//! # Design Principles
//!
//! 1. **Self-contained**: every event carries the ids it needs to be executed
//! 2. **Bandwidth is i64**: bits per second, never floats
//! 3. **Time is i64**: nanoseconds of simulated time

use crate::engine::{NackReason, TransmissionResult};
use crate::models::{Message, TransmissionDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages a message passes through on its way across the cellular network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Sender → core network
    Uplink,

    /// Resolves receivers and their regions
    Geocaster,

    /// Core network → receiver(s)
    Downlink,

    /// Hand-over to the receiving application
    Delivery,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Uplink => "uplink",
            PipelineStage::Geocaster => "geocaster",
            PipelineStage::Downlink => "downlink",
            PipelineStage::Delivery => "delivery",
        };
        f.write_str(name)
    }
}

/// Deferred instruction to give reserved bandwidth back
///
/// Executing it frees `amount_bps` on the same region, node and direction
/// that were consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRelease {
    pub fire_at_ns: i64,
    pub direction: TransmissionDirection,
    pub region_id: String,

    /// Absent for multicast, whose node pool is never touched
    pub node_id: Option<String>,

    /// Registration epoch of the node record that was consumed from
    pub node_epoch: Option<u64>,

    pub amount_bps: i64,
}

/// Notice to the original sender that its reliable message did not arrive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeAcknowledgement {
    /// Node the notice is addressed to
    pub recipient_id: String,
    pub message: Message,
    pub end_time_ns: i64,
    pub reasons: Vec<NackReason>,
}

/// Hand-off of an outcome to the next pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingEvent {
    pub from: PipelineStage,
    pub to: PipelineStage,
    pub message_id: String,
    pub direction: TransmissionDirection,
    pub node_id: Option<String>,
    pub region_id: String,
    pub outcome: TransmissionResult,
}

impl ForwardingEvent {
    pub fn start_time_ns(&self) -> i64 {
        self.outcome.start_time_ns
    }

    pub fn end_time_ns(&self) -> i64 {
        self.outcome.end_time_ns
    }
}
