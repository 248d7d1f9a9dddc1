//! Outbound events and the release scheduler

pub mod scheduler;
pub mod types;

pub use scheduler::ReleaseScheduler;
pub use types::{CapacityRelease, ForwardingEvent, NegativeAcknowledgement, PipelineStage};
