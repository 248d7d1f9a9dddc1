//! Per-region channel properties consumed by the configured model

use super::delay::DelayModel;
use super::loss::TransmissionConfig;
use crate::models::TransmissionDirection;
use serde::{Deserialize, Serialize};

/// Delay and loss behaviour of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelProperties {
    pub delay: DelayModel,

    #[serde(default)]
    pub transmission: TransmissionConfig,
}

impl ChannelProperties {
    /// Lossless channel with the given delay model
    pub fn new(delay: DelayModel) -> Self {
        Self {
            delay,
            transmission: TransmissionConfig::default(),
        }
    }

    pub fn with_transmission(mut self, transmission: TransmissionConfig) -> Self {
        self.transmission = transmission;
        self
    }
}

/// The three channels of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProperties {
    pub uplink: ChannelProperties,
    pub downlink_unicast: ChannelProperties,
    pub downlink_multicast: ChannelProperties,
}

impl RegionProperties {
    /// Same channel properties in every direction
    pub fn uniform(channel: ChannelProperties) -> Self {
        Self {
            uplink: channel.clone(),
            downlink_unicast: channel.clone(),
            downlink_multicast: channel,
        }
    }

    /// Channel serving the given direction
    pub fn channel(&self, direction: TransmissionDirection) -> &ChannelProperties {
        match direction {
            TransmissionDirection::UplinkUnicast => &self.uplink,
            TransmissionDirection::DownlinkUnicast => &self.downlink_unicast,
            TransmissionDirection::DownlinkMulticast => &self.downlink_multicast,
        }
    }
}
