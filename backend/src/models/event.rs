//! Event logging for replay and auditing.
//!
//! Every decision the simulator takes is recorded as an [`Event`]. Replaying
//! the same requests with the same seed must yield an identical log, which
//! makes the log the primary tool for checking determinism.
//!
//! # Event Types
//!
//! - **Transmission**: a message was sent (acknowledged or not) or dropped
//! - **Notification**: a NACK went back to the sender
//! - **Capacity**: reserved bandwidth was given back
//! - **Node lifecycle**: registration, removal, enablement changes
//!
//! # Example
//!
//! ```rust
//! use cell_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::NodeRegistered {
//!     time_ns: 0,
//!     node_id: "veh_0".to_string(),
//!     region_id: "global".to_string(),
//! });
//!
//! assert_eq!(log.events_for_node("veh_0").len(), 1);
//! assert_eq!(log.events()[0].event_type(), "NodeRegistered");
//! ```

use crate::engine::NackReason;
use crate::models::TransmissionDirection;
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events carry the simulated time (ns) they happened at and are logged
/// in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum Event {
    /// Message went out and holds capacity until its release
    TransmissionSent {
        time_ns: i64,
        message_id: String,
        direction: TransmissionDirection,
        node_id: Option<String>,
        region_id: String,
        end_time_ns: i64,
        reserved_bps: i64,
        acknowledged: bool,
        reasons: Vec<NackReason>,
    },

    /// Message never reserved capacity
    TransmissionDropped {
        time_ns: i64,
        message_id: String,
        direction: TransmissionDirection,
        node_id: Option<String>,
        region_id: String,
        reasons: Vec<NackReason>,
    },

    /// Reliable message failed and its sender was told
    NackSent {
        time_ns: i64,
        message_id: String,
        recipient_id: String,
        reasons: Vec<NackReason>,
    },

    /// Reserved bandwidth returned to the pools
    CapacityReleased {
        time_ns: i64,
        direction: TransmissionDirection,
        region_id: String,
        node_id: Option<String>,
        amount_bps: i64,
    },

    NodeRegistered {
        time_ns: i64,
        node_id: String,
        region_id: String,
    },

    NodeRemoved {
        time_ns: i64,
        node_id: String,
    },

    NodeEnabledChanged {
        time_ns: i64,
        node_id: String,
        enabled: bool,
    },
}

impl Event {
    /// Simulated time of the event
    pub fn time_ns(&self) -> i64 {
        match self {
            Event::TransmissionSent { time_ns, .. }
            | Event::TransmissionDropped { time_ns, .. }
            | Event::NackSent { time_ns, .. }
            | Event::CapacityReleased { time_ns, .. }
            | Event::NodeRegistered { time_ns, .. }
            | Event::NodeRemoved { time_ns, .. }
            | Event::NodeEnabledChanged { time_ns, .. } => *time_ns,
        }
    }

    /// Event type name (for filtering)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TransmissionSent { .. } => "TransmissionSent",
            Event::TransmissionDropped { .. } => "TransmissionDropped",
            Event::NackSent { .. } => "NackSent",
            Event::CapacityReleased { .. } => "CapacityReleased",
            Event::NodeRegistered { .. } => "NodeRegistered",
            Event::NodeRemoved { .. } => "NodeRemoved",
            Event::NodeEnabledChanged { .. } => "NodeEnabledChanged",
        }
    }

    /// Message ID if the event relates to a specific message
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Event::TransmissionSent { message_id, .. }
            | Event::TransmissionDropped { message_id, .. }
            | Event::NackSent { message_id, .. } => Some(message_id),
            _ => None,
        }
    }

    /// Node ID if the event relates to a specific node
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Event::TransmissionSent { node_id, .. }
            | Event::TransmissionDropped { node_id, .. }
            | Event::CapacityReleased { node_id, .. } => node_id.as_deref(),
            Event::NackSent { recipient_id, .. } => Some(recipient_id),
            Event::NodeRegistered { node_id, .. }
            | Event::NodeRemoved { node_id, .. }
            | Event::NodeEnabledChanged { node_id, .. } => Some(node_id),
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// A thin wrapper around `Vec<Event>` with convenience queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events logged at exactly `time_ns`
    pub fn events_at(&self, time_ns: i64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.time_ns() == time_ns).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_message(&self, message_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.message_id() == Some(message_id))
            .collect()
    }

    pub fn events_for_node(&self, node_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.node_id() == Some(node_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
