//! Delay and loss modelling
//!
//! - **delay**: core delay distributions
//! - **loss**: Bernoulli loss with bounded retransmission
//! - **channel**: per-region, per-direction settings
//! - **model**: the strategy trait the engine consumes

pub mod channel;
pub mod delay;
pub mod loss;
pub mod model;

pub use channel::{ChannelProperties, RegionProperties};
pub use delay::{DelayError, DelayModel};
pub use loss::{simulate_transmission, TransmissionConfig, TransmissionOutcome};
pub use model::{ConfiguredTransmissionModel, FixedTransmissionModel, TransmissionModel};
