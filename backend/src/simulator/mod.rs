//! Simulator - chain manager around the transmission core
//!
//! See `engine.rs` for the driver and `checkpoint.rs` for save/restore.

pub mod checkpoint;
pub mod engine;

pub use checkpoint::{
    compute_config_hash, CheckpointError, NodeSnapshot, RegionSnapshot, StateSnapshot,
};
pub use engine::{CellSimulator, DownlinkTarget, SimulationError, SimulatorConfig};
