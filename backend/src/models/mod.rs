//! Domain models for the cellular transmission core

pub mod direction;
pub mod event;
pub mod message;
pub mod node;
pub mod pool;
pub mod region;

// Re-exports
pub use direction::TransmissionDirection;
pub use event::{Event, EventLog};
pub use message::{Message, Routing, Transport};
pub use node::NodeCapacity;
pub use pool::LinkPool;
pub use region::{Region, GLOBAL_REGION_ID};
