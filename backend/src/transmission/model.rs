//! Delay & loss strategy
//!
//! The engine never samples delays or losses itself; it asks a
//! [`TransmissionModel`]. Implementations must draw all randomness from the
//! `RngManager` they are handed so that replays stay reproducible.

use super::loss::{simulate_transmission, TransmissionOutcome};
use crate::models::{Region, TransmissionDirection};
use crate::rng::RngManager;
use tracing::trace;

/// Pluggable delay and loss model
pub trait TransmissionModel {
    /// Baseline delay of a single attempt (ns, > 0)
    fn core_delay(
        &self,
        region: &Region,
        direction: TransmissionDirection,
        node_id: Option<&str>,
        rng: &mut RngManager,
    ) -> i64;

    /// Whether the message gets through and how many attempts it takes
    fn loss_outcome(
        &self,
        rng: &mut RngManager,
        region: &Region,
        direction: TransmissionDirection,
    ) -> TransmissionOutcome;
}

/// Model driven by the region's configured channel properties
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredTransmissionModel;

impl TransmissionModel for ConfiguredTransmissionModel {
    fn core_delay(
        &self,
        region: &Region,
        direction: TransmissionDirection,
        node_id: Option<&str>,
        rng: &mut RngManager,
    ) -> i64 {
        let delay = region.properties().channel(direction).delay.sample(rng);
        trace!(region = region.id(), %direction, node = ?node_id, delay, "sampled core delay");
        delay
    }

    fn loss_outcome(
        &self,
        rng: &mut RngManager,
        region: &Region,
        direction: TransmissionDirection,
    ) -> TransmissionOutcome {
        let config = &region.properties().channel(direction).transmission;
        simulate_transmission(rng, config.loss_probability, config.max_retries)
    }
}

/// Constant delay and a canned outcome, ignoring region settings
///
/// Never touches the RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTransmissionModel {
    pub delay_ns: i64,
    pub outcome: TransmissionOutcome,
}

impl FixedTransmissionModel {
    /// Lossless single-attempt model
    pub fn new(delay_ns: i64) -> Self {
        Self {
            delay_ns,
            outcome: TransmissionOutcome::delivered(),
        }
    }

    pub fn with_outcome(mut self, success: bool, attempts: u32) -> Self {
        self.outcome = TransmissionOutcome { success, attempts };
        self
    }
}

impl TransmissionModel for FixedTransmissionModel {
    fn core_delay(
        &self,
        _region: &Region,
        _direction: TransmissionDirection,
        _node_id: Option<&str>,
        _rng: &mut RngManager,
    ) -> i64 {
        self.delay_ns
    }

    fn loss_outcome(
        &self,
        _rng: &mut RngManager,
        _region: &Region,
        _direction: TransmissionDirection,
    ) -> TransmissionOutcome {
        self.outcome
    }
}
