//! Transmission direction
//!
//! The direction decides which capacity pools a transmission touches:
//! - uplink unicast: region uplink + sending node uplink
//! - downlink unicast: region downlink + receiving node downlink
//! - downlink multicast: region downlink only (one broadcast cost shared by
//!   every receiver, so no node record is consulted)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a cellular transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransmissionDirection {
    /// Node → base station
    UplinkUnicast,

    /// Base station → one node
    DownlinkUnicast,

    /// Base station → many nodes over one shared channel
    DownlinkMulticast,
}

impl TransmissionDirection {
    /// True for the uplink direction
    pub fn is_uplink(self) -> bool {
        matches!(self, TransmissionDirection::UplinkUnicast)
    }

    /// True for both downlink directions
    pub fn is_downlink(self) -> bool {
        !self.is_uplink()
    }

    /// True only for downlink multicast
    pub fn is_multicast(self) -> bool {
        matches!(self, TransmissionDirection::DownlinkMulticast)
    }

    /// Whether the node capacity record takes part in the accounting
    pub fn uses_node_capacity(self) -> bool {
        !self.is_multicast()
    }

    /// Short label used in logs and events
    pub fn as_str(self) -> &'static str {
        match self {
            TransmissionDirection::UplinkUnicast => "UplinkUnicast",
            TransmissionDirection::DownlinkUnicast => "DownlinkUnicast",
            TransmissionDirection::DownlinkMulticast => "DownlinkMulticast",
        }
    }
}

impl fmt::Display for TransmissionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
