//! Node capacity record
//!
//! Every node (vehicle modem, roadside unit, server) attached to the cellular
//! network owns one record: an enabled flag plus its own uplink and downlink
//! bitrate pools. The record exists from registration until the node leaves
//! the simulation.

use crate::models::pool::LinkPool;
use crate::models::TransmissionDirection;
use serde::{Deserialize, Serialize};

/// Cellular capacity record of one node
///
/// # Example
/// ```
/// use cell_simulator_core_rs::models::{NodeCapacity, TransmissionDirection};
///
/// let node = NodeCapacity::new("veh_0", true).with_bitrates(Some(2_000), Some(8_000));
/// assert!(node.is_enabled());
/// assert_eq!(node.remaining(TransmissionDirection::UplinkUnicast), 2_000);
/// assert_eq!(node.remaining(TransmissionDirection::DownlinkUnicast), 8_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCapacity {
    node_id: String,

    /// Registration this record belongs to; a node that leaves and comes
    /// back under the same id gets a new one
    epoch: u64,
    enabled: bool,
    uplink: LinkPool,
    downlink: LinkPool,
}

impl NodeCapacity {
    /// Node with unlimited bitrates
    pub fn new(node_id: impl Into<String>, enabled: bool) -> Self {
        Self {
            node_id: node_id.into(),
            epoch: 0,
            enabled,
            uplink: LinkPool::unlimited(),
            downlink: LinkPool::unlimited(),
        }
    }

    /// Set the maximum bitrates (`None` = unlimited)
    pub fn with_bitrates(mut self, uplink_bps: Option<i64>, downlink_bps: Option<i64>) -> Self {
        self.uplink = LinkPool::from_capacity(uplink_bps);
        self.downlink = LinkPool::from_capacity(downlink_bps);
        self
    }

    pub(crate) fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn uplink(&self) -> &LinkPool {
        &self.uplink
    }

    pub fn downlink(&self) -> &LinkPool {
        &self.downlink
    }

    /// Pool serving the given direction
    pub fn pool(&self, direction: TransmissionDirection) -> &LinkPool {
        if direction.is_uplink() {
            &self.uplink
        } else {
            &self.downlink
        }
    }

    pub(crate) fn pool_mut(&mut self, direction: TransmissionDirection) -> &mut LinkPool {
        if direction.is_uplink() {
            &mut self.uplink
        } else {
            &mut self.downlink
        }
    }

    /// Remaining bitrate in the given direction
    pub fn remaining(&self, direction: TransmissionDirection) -> i64 {
        self.pool(direction).remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let node = NodeCapacity::new("veh_0", true);
        assert!(node.uplink().is_unlimited());
        assert!(node.downlink().is_unlimited());
    }

    #[test]
    fn test_toggle_enabled() {
        let mut node = NodeCapacity::new("veh_0", true);
        node.set_enabled(false);
        assert!(!node.is_enabled());
    }
}
