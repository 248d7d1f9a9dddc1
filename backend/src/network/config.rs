//! Network configuration
//!
//! Plain serde structures; reading files is left to the host. A network is
//! one implicit global region plus any number of named regions, each with
//! uplink and downlink settings:
//!
//! ```json
//! {
//!   "global_network": {
//!     "uplink": { "delay": { "type": "constant", "delay": 100000000 }, "capacity": 28000000 },
//!     "downlink": {
//!       "unicast": { "delay": { "type": "constant", "delay": 50000000 } },
//!       "multicast": { "delay": { "type": "constant", "delay": 50000000 } },
//!       "capacity": 42200000
//!     }
//!   },
//!   "regions": []
//! }
//! ```
//!
//! A missing `capacity` means the pool is unlimited.

use crate::models::GLOBAL_REGION_ID;
use crate::transmission::{
    ChannelProperties, DelayError, DelayModel, RegionProperties, TransmissionConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Configuration loading/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid network config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {channel} delay in region '{region}': {source}")]
    InvalidDelay {
        region: String,
        channel: &'static str,
        #[source]
        source: DelayError,
    },

    #[error("Loss probability {value} of {channel} channel in region '{region}' is outside [0, 1]")]
    InvalidLossProbability {
        region: String,
        channel: &'static str,
        value: f64,
    },

    #[error("Negative {direction} capacity {value} in region '{region}'")]
    InvalidCapacity {
        region: String,
        direction: &'static str,
        value: i64,
    },

    #[error("Duplicate region id: {0}")]
    DuplicateRegion(String),

    #[error("Region id '{0}' is reserved for the global network")]
    ReservedRegionId(String),

    #[error("Global network must use id 'global', got '{0}'")]
    GlobalRegionId(String),

    #[error("Negative {direction} bitrate {value} for node '{node}'")]
    InvalidBitrate {
        node: String,
        direction: &'static str,
        value: i64,
    },

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

fn default_region_id() -> String {
    GLOBAL_REGION_ID.to_string()
}

fn default_enabled() -> bool {
    true
}

/// Uplink settings of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkConfig {
    pub delay: DelayModel,

    #[serde(default)]
    pub transmission: TransmissionConfig,

    /// Shared bitrate (bits/sec), unlimited if absent
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// Downlink settings of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownlinkConfig {
    pub unicast: ChannelProperties,
    pub multicast: ChannelProperties,

    /// Shared by unicast and multicast, unlimited if absent
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// One region of the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_region_id")]
    pub id: String,
    pub uplink: UplinkConfig,
    pub downlink: DownlinkConfig,
}

impl RegionConfig {
    /// Region with the same constant-delay lossless channel everywhere
    pub fn uniform(
        id: impl Into<String>,
        delay_ns: i64,
        uplink_capacity: Option<i64>,
        downlink_capacity: Option<i64>,
    ) -> Self {
        let channel = ChannelProperties::new(DelayModel::Constant { delay: delay_ns });
        Self {
            id: id.into(),
            uplink: UplinkConfig {
                delay: channel.delay.clone(),
                transmission: TransmissionConfig::default(),
                capacity: uplink_capacity,
            },
            downlink: DownlinkConfig {
                unicast: channel.clone(),
                multicast: channel,
                capacity: downlink_capacity,
            },
        }
    }

    /// Channel properties in the form the transmission model reads them
    pub fn properties(&self) -> RegionProperties {
        RegionProperties {
            uplink: ChannelProperties {
                delay: self.uplink.delay.clone(),
                transmission: self.uplink.transmission.clone(),
            },
            downlink_unicast: self.downlink.unicast.clone(),
            downlink_multicast: self.downlink.multicast.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let channels = [
            ("uplink", &self.uplink.delay, &self.uplink.transmission),
            (
                "downlink unicast",
                &self.downlink.unicast.delay,
                &self.downlink.unicast.transmission,
            ),
            (
                "downlink multicast",
                &self.downlink.multicast.delay,
                &self.downlink.multicast.transmission,
            ),
        ];
        for (channel, delay, transmission) in channels {
            delay.validate().map_err(|source| ConfigError::InvalidDelay {
                region: self.id.clone(),
                channel,
                source,
            })?;
            let p = transmission.loss_probability;
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidLossProbability {
                    region: self.id.clone(),
                    channel,
                    value: p,
                });
            }
        }

        for (direction, capacity) in [
            ("uplink", self.uplink.capacity),
            ("downlink", self.downlink.capacity),
        ] {
            if let Some(value) = capacity.filter(|c| *c < 0) {
                return Err(ConfigError::InvalidCapacity {
                    region: self.id.clone(),
                    direction,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Whole cellular network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub global_network: RegionConfig,

    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

impl NetworkConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_network.id != GLOBAL_REGION_ID {
            return Err(ConfigError::GlobalRegionId(self.global_network.id.clone()));
        }
        self.global_network.validate()?;

        let mut seen = BTreeSet::new();
        for region in &self.regions {
            if region.id == GLOBAL_REGION_ID {
                return Err(ConfigError::ReservedRegionId(region.id.clone()));
            }
            if !seen.insert(region.id.as_str()) {
                return Err(ConfigError::DuplicateRegion(region.id.clone()));
            }
            region.validate()?;
        }
        Ok(())
    }
}

/// A node known at simulation start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,

    /// Region the node sits in, global if absent
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum uplink bitrate, unlimited if absent
    #[serde(default)]
    pub max_uplink_bitrate: Option<i64>,

    /// Maximum downlink bitrate, unlimited if absent
    #[serde(default)]
    pub max_downlink_bitrate: Option<i64>,
}

impl NodeConfig {
    /// Enabled node in the global region with unlimited bitrates
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: None,
            enabled: true,
            max_uplink_bitrate: None,
            max_downlink_bitrate: None,
        }
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_bitrates(mut self, uplink_bps: Option<i64>, downlink_bps: Option<i64>) -> Self {
        self.max_uplink_bitrate = uplink_bps;
        self.max_downlink_bitrate = downlink_bps;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (direction, bitrate) in [
            ("uplink", self.max_uplink_bitrate),
            ("downlink", self.max_downlink_bitrate),
        ] {
            if let Some(value) = bitrate.filter(|b| *b < 0) {
                return Err(ConfigError::InvalidBitrate {
                    node: self.id.clone(),
                    direction,
                    value,
                });
            }
        }
        Ok(())
    }
}
