//! Uplink and downlink direction modules
//!
//! A direction module runs the engine for one message and turns the result
//! into outbound events:
//!
//! - a [`CapacityRelease`] when capacity was reserved
//! - a [`NegativeAcknowledgement`] when a reliable message was not delivered
//! - a [`ForwardingEvent`] to the next stage, always
//!
//! Both modules share the same handling; they differ in which directions
//! they accept and where they forward to.

use crate::capacity;
use crate::engine::{EngineStats, TransmissionEngine, TransmissionInput, TransmissionResult};
use crate::events::{CapacityRelease, ForwardingEvent, NegativeAcknowledgement, PipelineStage};
use crate::models::{Message, NodeCapacity, Region, TransmissionDirection};
use crate::network::CellNetwork;
use crate::rng::RngManager;
use crate::transmission::TransmissionModel;
use tracing::{debug, warn};

/// Request handed to a direction module
#[derive(Debug)]
pub struct ModuleRequest<'a> {
    pub start_time_ns: i64,
    pub message: &'a Message,
    pub direction: TransmissionDirection,
    pub node_id: Option<&'a str>,
    pub region: &'a mut Region,
    pub node: Option<&'a mut NodeCapacity>,
}

/// Events produced for one message
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOutput {
    pub result: TransmissionResult,
    pub release: Option<CapacityRelease>,
    pub nack: Option<NegativeAcknowledgement>,
    pub forward: ForwardingEvent,
}

/// Shared behaviour of the uplink and downlink modules
pub trait DirectionModule {
    /// Stage this module represents
    fn stage(&self) -> PipelineStage;

    /// Stage results are forwarded to
    fn next_stage(&self) -> PipelineStage;

    fn accepts(&self, direction: TransmissionDirection) -> bool;

    fn engine(&self) -> &TransmissionEngine;

    fn engine_mut(&mut self) -> &mut TransmissionEngine;

    /// Messages this module has handled
    fn processed_messages(&self) -> u64 {
        self.engine().processed_messages()
    }

    fn stats(&self) -> EngineStats {
        self.engine().stats()
    }

    /// Decide one transmission and build its events
    ///
    /// # Panics
    /// Panics if the module does not handle `request.direction`.
    fn process(
        &mut self,
        request: ModuleRequest<'_>,
        model: &dyn TransmissionModel,
        rng: &mut RngManager,
    ) -> ModuleOutput {
        assert!(
            self.accepts(request.direction),
            "{} module cannot handle {} transmissions",
            self.stage(),
            request.direction
        );

        let message = request.message;
        let direction = request.direction;
        let region_id = request.region.id().to_string();
        let node_id = request.node_id.map(str::to_string);
        let node_epoch = request.node.as_deref().map(NodeCapacity::epoch);

        let result = self.engine_mut().process(
            TransmissionInput {
                start_time_ns: request.start_time_ns,
                message,
                direction,
                node_id: request.node_id,
                region: request.region,
                node: request.node,
            },
            model,
            rng,
        );

        let release = result.is_processed().then(|| CapacityRelease {
            fire_at_ns: result.end_time_ns + message.streaming_duration_ns(),
            direction,
            region_id: region_id.clone(),
            node_id: node_id.clone().filter(|_| direction.uses_node_capacity()),
            node_epoch: node_epoch.filter(|_| direction.uses_node_capacity()),
            amount_bps: result.reserved_bps,
        });

        let nack = (!result.is_acknowledged() && message.transport().is_reliable()).then(|| {
            debug!(
                message = message.id(),
                sender = message.sender_id(),
                reasons = ?result.nack_reasons(),
                "sending negative acknowledgement"
            );
            NegativeAcknowledgement {
                recipient_id: message.sender_id().to_string(),
                message: message.clone(),
                end_time_ns: result.end_time_ns,
                reasons: result.nack_reasons().to_vec(),
            }
        });

        let forward = ForwardingEvent {
            from: self.stage(),
            to: self.next_stage(),
            message_id: message.id().to_string(),
            direction,
            node_id,
            region_id,
            outcome: result.clone(),
        };

        ModuleOutput {
            result,
            release,
            nack,
            forward,
        }
    }
}

/// Sender → core network; forwards to the geocaster
#[derive(Debug, Clone, Default)]
pub struct UplinkModule {
    engine: TransmissionEngine,
}

impl UplinkModule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectionModule for UplinkModule {
    fn stage(&self) -> PipelineStage {
        PipelineStage::Uplink
    }

    fn next_stage(&self) -> PipelineStage {
        PipelineStage::Geocaster
    }

    fn accepts(&self, direction: TransmissionDirection) -> bool {
        direction == TransmissionDirection::UplinkUnicast
    }

    fn engine(&self) -> &TransmissionEngine {
        &self.engine
    }

    fn engine_mut(&mut self) -> &mut TransmissionEngine {
        &mut self.engine
    }
}

/// Core network → receiver(s); forwards to final delivery
#[derive(Debug, Clone, Default)]
pub struct DownlinkModule {
    engine: TransmissionEngine,
}

impl DownlinkModule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectionModule for DownlinkModule {
    fn stage(&self) -> PipelineStage {
        PipelineStage::Downlink
    }

    fn next_stage(&self) -> PipelineStage {
        PipelineStage::Delivery
    }

    fn accepts(&self, direction: TransmissionDirection) -> bool {
        direction.is_downlink()
    }

    fn engine(&self) -> &TransmissionEngine {
        &self.engine
    }

    fn engine_mut(&mut self) -> &mut TransmissionEngine {
        &mut self.engine
    }
}

/// Execute a fired release against the registry
///
/// The region is always freed. A node that has left the simulation is
/// skipped, as is a record registered again under the same id after the
/// capacity was consumed.
pub fn free_bandwidth(release: &CapacityRelease, network: &mut CellNetwork) {
    match network.handles_mut(&release.region_id, release.node_id.as_deref()) {
        Ok((region, node)) => {
            let node = node.filter(|n| Some(n.epoch()) == release.node_epoch);
            if release.direction.uses_node_capacity() && node.is_none() {
                debug!(
                    node = ?release.node_id,
                    epoch = ?release.node_epoch,
                    amount = release.amount_bps,
                    "node gone, freeing region capacity only"
                );
            }
            capacity::free(release.direction, Some(region), node, release.amount_bps);
        }
        Err(err) => warn!(%err, amount = release.amount_bps, "dropping capacity release"),
    }
}
