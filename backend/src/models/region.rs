//! Region model
//!
//! A region is a geographic partition of the cellular network. All nodes
//! inside it share one uplink and one downlink pool. Besides the configured
//! regions there is always one implicit global region covering everything
//! else.

use crate::models::pool::LinkPool;
use crate::models::TransmissionDirection;
use crate::transmission::RegionProperties;
use serde::{Deserialize, Serialize};

/// Identifier of the implicit global region
pub const GLOBAL_REGION_ID: &str = "global";

/// A region with its shared capacity pools and channel properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier
    id: String,

    /// Shared uplink pool
    uplink: LinkPool,

    /// Shared downlink pool (unicast and multicast)
    downlink: LinkPool,

    /// Delay and loss settings per channel
    properties: RegionProperties,
}

impl Region {
    /// Create a region
    ///
    /// `None` capacities mean unlimited.
    pub fn new(
        id: impl Into<String>,
        uplink_capacity: Option<i64>,
        downlink_capacity: Option<i64>,
        properties: RegionProperties,
    ) -> Self {
        Self {
            id: id.into(),
            uplink: LinkPool::from_capacity(uplink_capacity),
            downlink: LinkPool::from_capacity(downlink_capacity),
            properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_global(&self) -> bool {
        self.id == GLOBAL_REGION_ID
    }

    pub fn properties(&self) -> &RegionProperties {
        &self.properties
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

    /// Remaining capacity in the given direction
    pub fn remaining(&self, direction: TransmissionDirection) -> i64 {
        self.pool(direction).remaining()
    }
}
