//! Message model
//!
//! A message is opaque to the core except for:
//! - its length in bits (drives the packet bandwidth demand)
//! - its routing kind (packet vs. stream)
//! - its transport (reliable TCP vs. fire-and-forget UDP)
//! - its sender (recipient of negative acknowledgements)

use crate::core::units::BYTE;
use serde::{Deserialize, Serialize};

/// Transport protocol hint carried by the message routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Reliable transport: the sender is told about failed deliveries
    Tcp,

    /// Unreliable transport: failures are silent
    Udp,
}

impl Transport {
    /// Whether the sender expects negative acknowledgements
    pub fn is_reliable(self) -> bool {
        matches!(self, Transport::Tcp)
    }
}

/// How the message is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Routing {
    /// Discrete one-shot packet, subject to total loss
    Packet,

    /// Continuous stream: never totally lost, occupies a fixed rate for
    /// its duration
    Stream {
        /// How long the stream keeps its bandwidth after the first packet (ns)
        duration_ns: i64,
        /// Fixed streaming rate (bits per second)
        bandwidth_bps: i64,
    },
}

/// A message handed to the cell core for transmission
///
/// # Example
/// ```
/// use cell_simulator_core_rs::models::{Message, Transport};
///
/// let msg = Message::packet("veh_0", 600).with_transport(Transport::Tcp);
/// assert_eq!(msg.length_bits(), 600);
/// assert!(!msg.is_stream());
/// assert!(msg.transport().is_reliable());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID)
    id: String,

    /// Node that originally sent the message
    sender_id: String,

    /// Payload length in bits
    length_bits: i64,

    /// Packet or stream delivery
    routing: Routing,

    /// Transport hint
    transport: Transport,
}

impl Message {
    /// Create a packet-routed UDP message
    pub fn packet(sender_id: impl Into<String>, length_bits: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            length_bits,
            routing: Routing::Packet,
            transport: Transport::Udp,
        }
    }

    /// Create a stream-routed UDP message
    pub fn stream(
        sender_id: impl Into<String>,
        length_bits: i64,
        duration_ns: i64,
        bandwidth_bps: i64,
    ) -> Self {
        Self {
            routing: Routing::Stream {
                duration_ns,
                bandwidth_bps,
            },
            ..Self::packet(sender_id, length_bits)
        }
    }

    /// Create a packet-routed UDP message sized in bytes
    pub fn packet_bytes(sender_id: impl Into<String>, length_bytes: i64) -> Self {
        Self::packet(sender_id, length_bytes * BYTE)
    }

    /// Set the transport protocol
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Override the generated identifier (replays, tests)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn length_bits(&self) -> i64 {
        self.length_bits
    }

    pub fn routing(&self) -> Routing {
        self.routing
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// True for stream-routed messages
    pub fn is_stream(&self) -> bool {
        matches!(self.routing, Routing::Stream { .. })
    }

    /// Streaming duration (0 for packets)
    pub fn streaming_duration_ns(&self) -> i64 {
        match self.routing {
            Routing::Stream { duration_ns, .. } => duration_ns,
            Routing::Packet => 0,
        }
    }

    /// Fixed streaming rate (0 for packets)
    pub fn streaming_bandwidth_bps(&self) -> i64 {
        match self.routing {
            Routing::Stream { bandwidth_bps, .. } => bandwidth_bps,
            Routing::Packet => 0,
        }
    }
}
