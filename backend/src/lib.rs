//! Cell Simulator Core - Rust Engine
//!
//! Message transmission over a capacity-limited cellular network, for use
//! inside a larger time-stepped co-simulation.
//!
//! # Architecture
//!
//! - **core**: Time and data units
//! - **models**: Domain types (Region, NodeCapacity, Message, Event)
//! - **capacity**: Consume/free/query operations on the shared pools
//! - **transmission**: Pluggable delay & loss models
//! - **engine**: Per-message transmission decisions
//! - **modules**: Uplink/downlink modules turning decisions into events
//! - **events**: Outbound events and the release scheduler
//! - **network**: Region/node registry and configuration
//! - **simulator**: Chain manager driving all of the above
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Bandwidth is i64 bits/sec, sizes are bits, time is i64 nanoseconds
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Every consumed unit of bandwidth is freed exactly once

// Module declarations
pub mod capacity;
pub mod core;
pub mod engine;
pub mod events;
pub mod models;
pub mod modules;
pub mod network;
pub mod rng;
pub mod simulator;
pub mod transmission;

// Re-exports for convenience
pub use engine::{NackReason, TransmissionEngine, TransmissionResult, TransmissionStatus};
pub use events::{CapacityRelease, ForwardingEvent, NegativeAcknowledgement, PipelineStage};
pub use models::{
    Event, EventLog, Message, NodeCapacity, Region, Routing, TransmissionDirection, Transport,
};
pub use modules::{DirectionModule, DownlinkModule, ModuleOutput, UplinkModule};
pub use network::{CellNetwork, NetworkConfig, NodeConfig, RegionConfig};
pub use rng::RngManager;
pub use simulator::{CellSimulator, DownlinkTarget, SimulationError, SimulatorConfig};
