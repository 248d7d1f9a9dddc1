//! Cell simulator - chain manager driving the transmission core
//!
//! Owns the registry, the RNG, the delay/loss model, both direction modules,
//! the release scheduler and the event log. The host submits transmissions
//! and advances time; releases fire strictly in time order.
//!
//! # Time Model
//!
//! The simulator never moves its clock by itself. `advance_to(t)` executes
//! every release due at or before `t`, in fire-time order, then sets the
//! clock to `t`. Submitting a message first advances to its start time, so
//! bandwidth released at that instant is available to it.

use crate::core::time::format_time;
use crate::events::{CapacityRelease, ReleaseScheduler};
use crate::models::{Event, EventLog, Message, TransmissionDirection};
use crate::modules::{
    free_bandwidth, DirectionModule, DownlinkModule, ModuleOutput, ModuleRequest, UplinkModule,
};
use crate::network::{CellNetwork, ConfigError, NetworkConfig, NetworkError, NodeConfig};
use crate::rng::RngManager;
use crate::simulator::checkpoint::{
    compute_config_hash, validate_snapshot, CheckpointError, NodeSnapshot, RegionSnapshot,
    StateSnapshot,
};
use crate::transmission::{ConfiguredTransmissionModel, TransmissionModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Seed of the shared RNG
    pub rng_seed: u64,

    pub network: NetworkConfig,

    /// Nodes registered at time 0
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            node.validate()?;
            if !seen.insert(node.id.as_str()) {
                return Err(ConfigError::DuplicateNode(node.id.clone()));
            }
        }
        Ok(())
    }
}

/// Where a downlink transmission goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownlinkTarget {
    /// One receiver, in the region it is assigned to
    Unicast { receiver_id: String },

    /// Every receiver in a region
    Multicast { region_id: String },
}

/// Simulator errors
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Cannot move time backwards from {current_ns} ns to {requested_ns} ns")]
    TimeWentBackwards { current_ns: i64, requested_ns: i64 },
}

// ============================================================================
// Simulator
// ============================================================================

/// Chain manager of the cellular transmission core
pub struct CellSimulator {
    config: SimulatorConfig,
    config_hash: String,
    current_time_ns: i64,
    network: CellNetwork,
    rng: RngManager,
    model: Box<dyn TransmissionModel>,
    uplink: UplinkModule,
    downlink: DownlinkModule,
    scheduler: ReleaseScheduler,
    event_log: EventLog,
}

impl std::fmt::Debug for CellSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellSimulator")
            .field("current_time_ns", &self.current_time_ns)
            .field("nodes", &self.network.node_count())
            .field("pending_releases", &self.scheduler.len())
            .field("events", &self.event_log.len())
            .finish_non_exhaustive()
    }
}

impl CellSimulator {
    /// Create a simulator using the configured delay/loss model
    ///
    /// # Example
    ///
    /// ```rust
    /// use cell_simulator_core_rs::network::{NetworkConfig, NodeConfig, RegionConfig};
    /// use cell_simulator_core_rs::simulator::{CellSimulator, SimulatorConfig};
    /// use cell_simulator_core_rs::models::Message;
    /// use cell_simulator_core_rs::core::time::SECOND;
    ///
    /// let config = SimulatorConfig {
    ///     rng_seed: 42,
    ///     network: NetworkConfig {
    ///         global_network: RegionConfig::uniform("global", SECOND, Some(10_000), Some(10_000)),
    ///         regions: vec![],
    ///     },
    ///     nodes: vec![NodeConfig::new("veh_0")],
    /// };
    ///
    /// let mut sim = CellSimulator::new(config).unwrap();
    /// let output = sim.submit_uplink(0, &Message::packet("veh_0", 1_000)).unwrap();
    /// assert!(output.result.is_acknowledged());
    /// assert_eq!(sim.next_release_time(), Some(SECOND));
    /// ```
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        Self::with_model(config, Box::new(ConfiguredTransmissionModel))
    }

    /// Create a simulator with a custom delay/loss model
    pub fn with_model(
        config: SimulatorConfig,
        model: Box<dyn TransmissionModel>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let config_hash = compute_config_hash(&config)?;
        let network = CellNetwork::from_config(&config.network)?;

        let mut simulator = Self {
            rng: RngManager::new(config.rng_seed),
            config,
            config_hash,
            current_time_ns: 0,
            network,
            model,
            uplink: UplinkModule::new(),
            downlink: DownlinkModule::new(),
            scheduler: ReleaseScheduler::new(),
            event_log: EventLog::new(),
        };

        let nodes = simulator.config.nodes.clone();
        for node in &nodes {
            simulator.register_node(node)?;
        }
        info!(
            regions = simulator.network.regions().count(),
            nodes = nodes.len(),
            seed = simulator.config.rng_seed,
            "cell simulator ready"
        );
        Ok(simulator)
    }

    // ========================================================================
    // Node lifecycle
    // ========================================================================

    pub fn register_node(&mut self, node: &NodeConfig) -> Result<(), SimulationError> {
        self.network.register_node(node)?;
        self.event_log.log(Event::NodeRegistered {
            time_ns: self.current_time_ns,
            node_id: node.id.clone(),
            region_id: self.network.region_of(&node.id).to_string(),
        });
        Ok(())
    }

    /// Remove a node; its pending releases still free the region
    pub fn remove_node(&mut self, node_id: &str) -> Result<(), SimulationError> {
        self.network.remove_node(node_id)?;
        self.event_log.log(Event::NodeRemoved {
            time_ns: self.current_time_ns,
            node_id: node_id.to_string(),
        });
        Ok(())
    }

    pub fn set_node_enabled(&mut self, node_id: &str, enabled: bool) -> Result<(), SimulationError> {
        self.network.set_node_enabled(node_id, enabled)?;
        self.event_log.log(Event::NodeEnabledChanged {
            time_ns: self.current_time_ns,
            node_id: node_id.to_string(),
            enabled,
        });
        Ok(())
    }

    /// Move a node to another region (position resolution is the host's job)
    pub fn assign_region(&mut self, node_id: &str, region_id: &str) -> Result<(), SimulationError> {
        self.network.assign_region(node_id, region_id)?;
        Ok(())
    }

    // ========================================================================
    // Transmissions
    // ========================================================================

    /// Send a message from its sender into the core network
    ///
    /// An unregistered sender is treated as absent and the message is
    /// dropped as deactivated.
    pub fn submit_uplink(
        &mut self,
        start_time_ns: i64,
        message: &Message,
    ) -> Result<ModuleOutput, SimulationError> {
        self.advance_to(start_time_ns)?;

        let node_id = message.sender_id();
        let region_id = self.network.region_of(node_id).to_string();
        let (region, node) = self.network.handles_mut(&region_id, Some(node_id))?;

        let output = self.uplink.process(
            ModuleRequest {
                start_time_ns,
                message,
                direction: TransmissionDirection::UplinkUnicast,
                node_id: Some(node_id),
                region,
                node,
            },
            self.model.as_ref(),
            &mut self.rng,
        );
        self.record(&output);
        Ok(output)
    }

    /// Send a message from the core network to a receiver or a region
    pub fn submit_downlink(
        &mut self,
        start_time_ns: i64,
        message: &Message,
        target: &DownlinkTarget,
    ) -> Result<ModuleOutput, SimulationError> {
        self.advance_to(start_time_ns)?;

        let (direction, region_id, node_id) = match target {
            DownlinkTarget::Unicast { receiver_id } => (
                TransmissionDirection::DownlinkUnicast,
                self.network.region_of(receiver_id).to_string(),
                Some(receiver_id.as_str()),
            ),
            DownlinkTarget::Multicast { region_id } => (
                TransmissionDirection::DownlinkMulticast,
                region_id.clone(),
                None,
            ),
        };
        let (region, node) = self.network.handles_mut(&region_id, node_id)?;

        let output = self.downlink.process(
            ModuleRequest {
                start_time_ns,
                message,
                direction,
                node_id,
                region,
                node,
            },
            self.model.as_ref(),
            &mut self.rng,
        );
        self.record(&output);
        Ok(output)
    }

    fn record(&mut self, output: &ModuleOutput) {
        let forward = &output.forward;
        let result = &output.result;

        let event = if result.is_processed() {
            Event::TransmissionSent {
                time_ns: result.start_time_ns,
                message_id: forward.message_id.clone(),
                direction: forward.direction,
                node_id: forward.node_id.clone(),
                region_id: forward.region_id.clone(),
                end_time_ns: result.end_time_ns,
                reserved_bps: result.reserved_bps,
                acknowledged: result.is_acknowledged(),
                reasons: result.nack_reasons().to_vec(),
            }
        } else {
            Event::TransmissionDropped {
                time_ns: result.start_time_ns,
                message_id: forward.message_id.clone(),
                direction: forward.direction,
                node_id: forward.node_id.clone(),
                region_id: forward.region_id.clone(),
                reasons: result.nack_reasons().to_vec(),
            }
        };
        self.event_log.log(event);

        if let Some(nack) = &output.nack {
            self.event_log.log(Event::NackSent {
                time_ns: nack.end_time_ns,
                message_id: nack.message.id().to_string(),
                recipient_id: nack.recipient_id.clone(),
                reasons: nack.reasons.clone(),
            });
        }

        if let Some(release) = &output.release {
            self.scheduler.schedule(release.clone());
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Fire every release due at or before `time_ns` and move the clock there
    ///
    /// Returns the number of releases executed.
    pub fn advance_to(&mut self, time_ns: i64) -> Result<usize, SimulationError> {
        if time_ns < self.current_time_ns {
            return Err(SimulationError::TimeWentBackwards {
                current_ns: self.current_time_ns,
                requested_ns: time_ns,
            });
        }

        let due = self.scheduler.drain_due(time_ns);
        let fired = due.len();
        for release in due {
            free_bandwidth(&release, &mut self.network);
            self.event_log.log(Event::CapacityReleased {
                time_ns: release.fire_at_ns,
                direction: release.direction,
                region_id: release.region_id,
                node_id: release.node_id,
                amount_bps: release.amount_bps,
            });
        }
        self.current_time_ns = time_ns;

        if fired > 0 {
            debug!(time = %format_time(time_ns), fired, "capacity released");
        }
        Ok(fired)
    }

    /// Advance to the next pending release, if any
    pub fn advance_to_next_release(&mut self) -> Result<Option<i64>, SimulationError> {
        match self.scheduler.next_fire_time() {
            Some(time_ns) => {
                self.advance_to(time_ns.max(self.current_time_ns))?;
                Ok(Some(time_ns))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn current_time_ns(&self) -> i64 {
        self.current_time_ns
    }

    pub fn next_release_time(&self) -> Option<i64> {
        self.scheduler.next_fire_time()
    }

    /// Pending releases in firing order
    pub fn pending_releases(&self) -> Vec<CapacityRelease> {
        self.scheduler.pending()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn network(&self) -> &CellNetwork {
        &self.network
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn uplink(&self) -> &UplinkModule {
        &self.uplink
    }

    pub fn downlink(&self) -> &DownlinkModule {
        &self.downlink
    }

    /// Messages handled by both modules
    pub fn processed_messages(&self) -> u64 {
        self.uplink.processed_messages() + self.downlink.processed_messages()
    }

    // ========================================================================
    // Checkpointing
    // ========================================================================

    pub fn snapshot(&self) -> StateSnapshot {
        let regions = self
            .network
            .regions()
            .map(|region| RegionSnapshot {
                id: region.id().to_string(),
                uplink_remaining: region.uplink().remaining(),
                downlink_remaining: region.downlink().remaining(),
            })
            .collect();
        let nodes = self
            .network
            .nodes()
            .map(|node| NodeSnapshot {
                id: node.node_id().to_string(),
                epoch: node.epoch(),
                region_id: self.network.region_of(node.node_id()).to_string(),
                enabled: node.is_enabled(),
                max_uplink_bitrate: node.uplink().max(),
                max_downlink_bitrate: node.downlink().max(),
                uplink_remaining: node.uplink().remaining(),
                downlink_remaining: node.downlink().remaining(),
            })
            .collect();

        StateSnapshot {
            current_time_ns: self.current_time_ns,
            rng_state: self.rng.get_state(),
            regions,
            nodes,
            next_node_epoch: self.network.next_epoch(),
            pending_releases: self.scheduler.pending(),
            uplink_stats: self.uplink.stats(),
            downlink_stats: self.downlink.stats(),
            config_hash: self.config_hash.clone(),
        }
    }

    /// Serialize the current state to JSON
    pub fn save_checkpoint(&self) -> Result<String, SimulationError> {
        let json = serde_json::to_string(&self.snapshot()).map_err(CheckpointError::from)?;
        Ok(json)
    }

    /// Rebuild a simulator from a checkpoint taken under `config`
    ///
    /// The event log starts empty.
    pub fn load_checkpoint(config: SimulatorConfig, json: &str) -> Result<Self, SimulationError> {
        Self::load_checkpoint_with_model(config, json, Box::new(ConfiguredTransmissionModel))
    }

    pub fn load_checkpoint_with_model(
        config: SimulatorConfig,
        json: &str,
        model: Box<dyn TransmissionModel>,
    ) -> Result<Self, SimulationError> {
        let snapshot: StateSnapshot = serde_json::from_str(json).map_err(CheckpointError::from)?;
        Self::restore(config, snapshot, model)
    }

    /// Rebuild a simulator from an in-memory snapshot
    pub fn restore(
        config: SimulatorConfig,
        snapshot: StateSnapshot,
        model: Box<dyn TransmissionModel>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let config_hash = compute_config_hash(&config)?;
        let mut network = CellNetwork::from_config(&config.network)?;

        let known_regions: BTreeSet<String> =
            network.regions().map(|r| r.id().to_string()).collect();
        validate_snapshot(&snapshot, &config_hash, &known_regions)?;

        for saved in &snapshot.regions {
            let region = network.region_mut(&saved.id)?;
            region
                .pool_mut(TransmissionDirection::UplinkUnicast)
                .restore_remaining(saved.uplink_remaining);
            region
                .pool_mut(TransmissionDirection::DownlinkUnicast)
                .restore_remaining(saved.downlink_remaining);
        }

        for saved in &snapshot.nodes {
            let mut node_config = NodeConfig::new(saved.id.clone())
                .in_region(saved.region_id.clone())
                .with_bitrates(saved.max_uplink_bitrate, saved.max_downlink_bitrate);
            node_config.enabled = saved.enabled;
            network
                .restore_node(&node_config, saved.epoch)
                .map_err(CheckpointError::from)?;
            let node = network.node_mut(&saved.id)?;
            node.pool_mut(TransmissionDirection::UplinkUnicast)
                .restore_remaining(saved.uplink_remaining);
            node.pool_mut(TransmissionDirection::DownlinkUnicast)
                .restore_remaining(saved.downlink_remaining);
        }

        network.restore_next_epoch(snapshot.next_node_epoch);

        let mut scheduler = ReleaseScheduler::new();
        for release in snapshot.pending_releases {
            scheduler.schedule(release);
        }

        let mut uplink = UplinkModule::new();
        uplink.engine_mut().restore_stats(snapshot.uplink_stats);
        let mut downlink = DownlinkModule::new();
        downlink.engine_mut().restore_stats(snapshot.downlink_stats);

        info!(
            time = %format_time(snapshot.current_time_ns),
            pending = scheduler.len(),
            "restored cell simulator from checkpoint"
        );

        Ok(Self {
            rng: RngManager::new(snapshot.rng_state),
            config,
            config_hash,
            current_time_ns: snapshot.current_time_ns,
            network,
            model,
            uplink,
            downlink,
            scheduler,
            event_log: EventLog::new(),
        })
    }
}
