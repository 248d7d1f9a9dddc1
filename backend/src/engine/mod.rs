//! Transmission decision engine
//!
//! Decides for one message whether it can be sent, how long it takes, whether
//! it is lost and how much shared bandwidth it holds.
//!
//! # Decision Steps
//!
//! 1. **Enablement**: unicast needs an enabled node record; multicast always
//!    passes
//! 2. **Delay & loss**: one core delay sample and one loss roll; a failed
//!    stream is forced through with one extra attempt
//! 3. **Bandwidth sizing**: streams need their fixed rate; packets need
//!    `attempts × size / delay` and fall back to whatever is left before
//!    giving up
//! 4. **Commit**: the chosen bandwidth is consumed from the pools
//!
//! The engine never looks anything up: region and node arrive as explicit
//! handles, so its output depends only on its inputs and the RNG.

pub mod outcome;

pub use outcome::{EngineStats, NackReason, TransmissionResult, TransmissionStatus};

use crate::capacity::{self, needed_bandwidth, needed_delay};
use crate::models::{Message, NodeCapacity, Region, TransmissionDirection};
use crate::rng::RngManager;
use crate::transmission::TransmissionModel;
use tracing::{debug, trace};

/// One transmission request with its resolved pools
#[derive(Debug)]
pub struct TransmissionInput<'a> {
    pub start_time_ns: i64,
    pub message: &'a Message,
    pub direction: TransmissionDirection,

    /// Sender (uplink) or receiver (downlink unicast)
    pub node_id: Option<&'a str>,

    pub region: &'a mut Region,

    /// `None` when the node is not registered
    pub node: Option<&'a mut NodeCapacity>,
}

/// Outcome of bandwidth sizing
enum Sizing {
    Reserve { bandwidth_bps: i64, end_time_ns: i64 },
    Exhausted(Vec<NackReason>),
}

/// Per-direction decision engine with its diagnostic counters
#[derive(Debug, Clone, Default)]
pub struct TransmissionEngine {
    stats: EngineStats,
}

impl TransmissionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages handed to the engine so far, whatever their outcome
    pub fn processed_messages(&self) -> u64 {
        self.stats.processed_messages
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Checkpoint restore only
    pub(crate) fn restore_stats(&mut self, stats: EngineStats) {
        self.stats = stats;
    }

    /// Run one message through the decision steps
    ///
    /// # Panics
    /// Panics if the message has no bits or the model yields a non-positive
    /// delay for a packet.
    pub fn process(
        &mut self,
        input: TransmissionInput<'_>,
        model: &dyn TransmissionModel,
        rng: &mut RngManager,
    ) -> TransmissionResult {
        debug!(
            message = input.message.id(),
            direction = %input.direction,
            region = input.region.id(),
            node = ?input.node_id,
            start = input.start_time_ns,
            "processing transmission"
        );

        let result = if Self::is_node_enabled(input.direction, input.node.as_deref()) {
            Self::transmit(input, model, rng)
        } else {
            debug!(node = ?input.node_id, "node deactivated, dropping message");
            TransmissionResult::dropped(
                input.start_time_ns,
                input.start_time_ns,
                vec![NackReason::NodeDeactivated],
            )
        };

        trace!(
            status = ?result.status,
            delay = result.duration_ns(),
            reserved = result.reserved_bps,
            "transmission decided"
        );
        self.stats.record(&result);
        result
    }

    fn is_node_enabled(direction: TransmissionDirection, node: Option<&NodeCapacity>) -> bool {
        if direction.is_multicast() {
            return true;
        }
        node.is_some_and(NodeCapacity::is_enabled)
    }

    fn transmit(
        input: TransmissionInput<'_>,
        model: &dyn TransmissionModel,
        rng: &mut RngManager,
    ) -> TransmissionResult {
        let TransmissionInput {
            start_time_ns,
            message,
            direction,
            node_id,
            region,
            mut node,
        } = input;

        let core_delay = model.core_delay(region, direction, node_id, rng);
        let mut outcome = model.loss_outcome(rng, region, direction);
        let mut reasons = Vec::new();

        if !outcome.success {
            if message.is_stream() {
                outcome.attempts += 1;
                outcome.success = true;
            } else {
                debug!(
                    message = message.id(),
                    attempts = outcome.attempts,
                    "packet lost on every attempt"
                );
                reasons.push(NackReason::PacketLoss);
            }
        }

        let attempts = i64::from(outcome.attempts);
        let end_time_ns = start_time_ns + attempts * core_delay;

        let sizing = if message.is_stream() {
            Self::size_stream(message, direction, region, node.as_deref(), end_time_ns)
        } else {
            Self::size_packet(
                message,
                direction,
                region,
                node.as_deref(),
                start_time_ns,
                end_time_ns,
                core_delay,
                attempts,
            )
        };

        match sizing {
            Sizing::Exhausted(exhausted) => {
                debug!(
                    message = message.id(),
                    reasons = ?exhausted,
                    "not enough capacity, dropping message"
                );
                reasons.extend(exhausted);
                TransmissionResult::dropped(start_time_ns, end_time_ns, reasons)
            }
            Sizing::Reserve {
                bandwidth_bps,
                end_time_ns,
            } => {
                capacity::consume(direction, Some(region), node.as_deref_mut(), bandwidth_bps);
                let status = if reasons.is_empty() {
                    TransmissionStatus::SentAcknowledged
                } else {
                    TransmissionStatus::SentUnacknowledged(reasons)
                };
                TransmissionResult {
                    start_time_ns,
                    end_time_ns,
                    reserved_bps: bandwidth_bps,
                    status,
                }
            }
        }
    }

    fn size_stream(
        message: &Message,
        direction: TransmissionDirection,
        region: &Region,
        node: Option<&NodeCapacity>,
        end_time_ns: i64,
    ) -> Sizing {
        let needed = message.streaming_bandwidth_bps();
        let mut exhausted = Vec::new();
        if !capacity::region::is_sufficient(direction, Some(region), needed) {
            exhausted.push(NackReason::ChannelCapacityExceeded);
        }
        if !capacity::node::is_sufficient(direction, node, needed) {
            exhausted.push(NackReason::NodeCapacityExceeded);
        }
        if exhausted.is_empty() {
            Sizing::Reserve {
                bandwidth_bps: needed,
                end_time_ns,
            }
        } else {
            Sizing::Exhausted(exhausted)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn size_packet(
        message: &Message,
        direction: TransmissionDirection,
        region: &Region,
        node: Option<&NodeCapacity>,
        start_time_ns: i64,
        end_time_ns: i64,
        core_delay: i64,
        attempts: i64,
    ) -> Sizing {
        let size = message.length_bits();
        let needed = attempts * needed_bandwidth(size, core_delay);

        if capacity::is_sufficient(direction, Some(region), node, needed) {
            return Sizing::Reserve {
                bandwidth_bps: needed,
                end_time_ns,
            };
        }

        let available = capacity::available_amount(direction, Some(region), node);
        if available > 0 {
            let degraded_end = start_time_ns + needed_delay(size * attempts, available);
            debug!(
                message = message.id(),
                needed,
                available,
                end = degraded_end,
                "insufficient capacity, sending slower with what is left"
            );
            return Sizing::Reserve {
                bandwidth_bps: available,
                end_time_ns: degraded_end,
            };
        }

        // Node exhaustion only counts where the node is consulted at all
        let mut exhausted = Vec::new();
        if !capacity::region::is_available(direction, Some(region)) {
            exhausted.push(NackReason::ChannelCapacityExceeded);
        }
        if !capacity::node::is_available(direction, node) {
            exhausted.push(NackReason::NodeCapacityExceeded);
        }
        Sizing::Exhausted(exhausted)
    }
}
