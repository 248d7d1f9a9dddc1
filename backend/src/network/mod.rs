//! Region and node registry
//!
//! Owns every [`Region`] and [`NodeCapacity`] of a simulation and hands out
//! explicit handles to the engine. Nodes are assigned to exactly one region;
//! unassigned nodes live in the global region.
//!
//! Maps are `BTreeMap`s so that iteration (snapshots, reports) is
//! deterministic.

pub mod config;

pub use config::{
    ConfigError, DownlinkConfig, NetworkConfig, NodeConfig, RegionConfig, UplinkConfig,
};

use crate::models::{NodeCapacity, Region, GLOBAL_REGION_ID};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Registry lookup errors
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Node not registered: {0}")]
    NodeNotRegistered(String),

    #[error("Node already registered: {0}")]
    NodeAlreadyRegistered(String),

    #[error("Negative {direction} bitrate {value} for node '{node}'")]
    InvalidBitrate {
        node: String,
        direction: &'static str,
        value: i64,
    },
}

/// All regions and nodes of the cellular network
#[derive(Debug, Clone)]
pub struct CellNetwork {
    /// Includes the global region under [`GLOBAL_REGION_ID`]
    regions: BTreeMap<String, Region>,
    nodes: BTreeMap<String, NodeCapacity>,

    /// node id → region id
    assignments: BTreeMap<String, String>,

    /// Handed to the next registered node record
    next_epoch: u64,
}

impl CellNetwork {
    /// Build the regions described by a validated config
    pub fn from_config(config: &NetworkConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut regions = BTreeMap::new();
        for region in std::iter::once(&config.global_network).chain(&config.regions) {
            regions.insert(
                region.id.clone(),
                Region::new(
                    region.id.clone(),
                    region.uplink.capacity,
                    region.downlink.capacity,
                    region.properties(),
                ),
            );
        }

        Ok(Self {
            regions,
            nodes: BTreeMap::new(),
            assignments: BTreeMap::new(),
            next_epoch: 0,
        })
    }

    // ========================================================================
    // Regions
    // ========================================================================

    pub fn region(&self, region_id: &str) -> Result<&Region, NetworkError> {
        self.regions
            .get(region_id)
            .ok_or_else(|| NetworkError::UnknownRegion(region_id.to_string()))
    }

    pub fn region_mut(&mut self, region_id: &str) -> Result<&mut Region, NetworkError> {
        self.regions
            .get_mut(region_id)
            .ok_or_else(|| NetworkError::UnknownRegion(region_id.to_string()))
    }

    pub fn global_region(&self) -> Option<&Region> {
        self.regions.get(GLOBAL_REGION_ID)
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Add a node with its own capacity record
    ///
    /// Each registration gets a fresh epoch, so releases scheduled for an
    /// earlier record under the same id never reach this one.
    pub fn register_node(&mut self, node: &NodeConfig) -> Result<(), NetworkError> {
        let epoch = self.next_epoch;
        self.insert_node(node, epoch)?;
        self.next_epoch += 1;
        Ok(())
    }

    /// Re-create a checkpointed node under its saved epoch
    pub(crate) fn restore_node(&mut self, node: &NodeConfig, epoch: u64) -> Result<(), NetworkError> {
        self.insert_node(node, epoch)?;
        self.next_epoch = self.next_epoch.max(epoch + 1);
        Ok(())
    }

    pub(crate) fn restore_next_epoch(&mut self, next_epoch: u64) {
        self.next_epoch = self.next_epoch.max(next_epoch);
    }

    /// Epoch the next registered node will receive
    pub fn next_epoch(&self) -> u64 {
        self.next_epoch
    }

    fn insert_node(&mut self, node: &NodeConfig, epoch: u64) -> Result<(), NetworkError> {
        if self.nodes.contains_key(&node.id) {
            return Err(NetworkError::NodeAlreadyRegistered(node.id.clone()));
        }
        for (direction, bitrate) in [
            ("uplink", node.max_uplink_bitrate),
            ("downlink", node.max_downlink_bitrate),
        ] {
            if let Some(value) = bitrate.filter(|b| *b < 0) {
                return Err(NetworkError::InvalidBitrate {
                    node: node.id.clone(),
                    direction,
                    value,
                });
            }
        }
        let region_id = node.region.as_deref().unwrap_or(GLOBAL_REGION_ID);
        if !self.regions.contains_key(region_id) {
            return Err(NetworkError::UnknownRegion(region_id.to_string()));
        }

        let record = NodeCapacity::new(node.id.clone(), node.enabled)
            .with_bitrates(node.max_uplink_bitrate, node.max_downlink_bitrate)
            .with_epoch(epoch);
        self.nodes.insert(node.id.clone(), record);
        self.assignments
            .insert(node.id.clone(), region_id.to_string());
        debug!(node = %node.id, region = region_id, epoch, enabled = node.enabled, "registered node");
        Ok(())
    }

    /// Drop a node's record; releases still pending for it free the region only
    pub fn remove_node(&mut self, node_id: &str) -> Result<NodeCapacity, NetworkError> {
        let record = self
            .nodes
            .remove(node_id)
            .ok_or_else(|| NetworkError::NodeNotRegistered(node_id.to_string()))?;
        self.assignments.remove(node_id);
        debug!(node = node_id, "removed node");
        Ok(record)
    }

    pub fn node(&self, node_id: &str) -> Result<&NodeCapacity, NetworkError> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| NetworkError::NodeNotRegistered(node_id.to_string()))
    }

    pub fn node_mut(&mut self, node_id: &str) -> Result<&mut NodeCapacity, NetworkError> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| NetworkError::NodeNotRegistered(node_id.to_string()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeCapacity> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_node_enabled(&mut self, node_id: &str, enabled: bool) -> Result<(), NetworkError> {
        self.node_mut(node_id)?.set_enabled(enabled);
        debug!(node = node_id, enabled, "node enablement changed");
        Ok(())
    }

    /// Move a registered node into another region
    pub fn assign_region(&mut self, node_id: &str, region_id: &str) -> Result<(), NetworkError> {
        if !self.nodes.contains_key(node_id) {
            return Err(NetworkError::NodeNotRegistered(node_id.to_string()));
        }
        if !self.regions.contains_key(region_id) {
            return Err(NetworkError::UnknownRegion(region_id.to_string()));
        }
        self.assignments
            .insert(node_id.to_string(), region_id.to_string());
        Ok(())
    }

    /// Region the node sits in; unknown nodes fall back to the global region
    pub fn region_of(&self, node_id: &str) -> &str {
        self.assignments
            .get(node_id)
            .map(String::as_str)
            .unwrap_or(GLOBAL_REGION_ID)
    }

    /// Mutable handles to a region and, if registered, a node
    ///
    /// An unregistered node is logged and handed back as `None`, which the
    /// engine treats as absent.
    pub fn handles_mut(
        &mut self,
        region_id: &str,
        node_id: Option<&str>,
    ) -> Result<(&mut Region, Option<&mut NodeCapacity>), NetworkError> {
        let region = self
            .regions
            .get_mut(region_id)
            .ok_or_else(|| NetworkError::UnknownRegion(region_id.to_string()))?;
        let node = match node_id {
            Some(id) => {
                let node = self.nodes.get_mut(id);
                if node.is_none() {
                    warn!(node = id, "node not registered, treating as absent");
                }
                node
            }
            None => None,
        };
        Ok((region, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::MILLI_SECOND;
    use crate::models::TransmissionDirection;

    fn network() -> CellNetwork {
        let config = NetworkConfig {
            global_network: RegionConfig::uniform(GLOBAL_REGION_ID, 10 * MILLI_SECOND, None, None),
            regions: vec![RegionConfig::uniform(
                "downtown",
                20 * MILLI_SECOND,
                Some(1_000),
                Some(2_000),
            )],
        };
        CellNetwork::from_config(&config).unwrap()
    }

    #[test]
    fn test_regions_from_config() {
        let network = network();
        assert!(network.global_region().unwrap().is_global());
        let downtown = network.region("downtown").unwrap();
        assert_eq!(downtown.remaining(TransmissionDirection::UplinkUnicast), 1_000);
        assert_eq!(
            network.region("nowhere"),
            Err(NetworkError::UnknownRegion("nowhere".to_string()))
        );
    }

    #[test]
    fn test_register_and_remove_node() {
        let mut network = network();
        network
            .register_node(&NodeConfig::new("veh_0").in_region("downtown"))
            .unwrap();
        assert_eq!(network.region_of("veh_0"), "downtown");
        assert_eq!(
            network.register_node(&NodeConfig::new("veh_0")),
            Err(NetworkError::NodeAlreadyRegistered("veh_0".to_string()))
        );

        network.remove_node("veh_0").unwrap();
        assert_eq!(network.region_of("veh_0"), GLOBAL_REGION_ID);
        assert!(network.node("veh_0").is_err());
    }

    #[test]
    fn test_reregistration_gets_new_epoch() {
        let mut network = network();
        network.register_node(&NodeConfig::new("veh_0")).unwrap();
        let first = network.node("veh_0").unwrap().epoch();

        network.remove_node("veh_0").unwrap();
        network.register_node(&NodeConfig::new("veh_0")).unwrap();
        assert_ne!(network.node("veh_0").unwrap().epoch(), first);

        // A failed registration does not use up an epoch
        let next = network.next_epoch();
        assert!(network.register_node(&NodeConfig::new("veh_0")).is_err());
        assert_eq!(network.next_epoch(), next);
    }

    #[test]
    fn test_register_rejects_unknown_region() {
        let mut network = network();
        let result = network.register_node(&NodeConfig::new("veh_0").in_region("suburb"));
        assert_eq!(result, Err(NetworkError::UnknownRegion("suburb".to_string())));
        assert_eq!(network.node_count(), 0);
    }

    #[test]
    fn test_handles_for_unregistered_node() {
        let mut network = network();
        let (region, node) = network.handles_mut("downtown", Some("ghost")).unwrap();
        assert_eq!(region.id(), "downtown");
        assert!(node.is_none());
    }
}
