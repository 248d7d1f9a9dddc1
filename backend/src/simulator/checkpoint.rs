//! Checkpoint - Save/Load Simulator State
//!
//! Captures everything that changes while a simulation runs: remaining
//! capacity of every pool, registered nodes, pending releases, the RNG state
//! and the clock. Channel settings come from the config and are not stored.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored simulator produces the same outcomes as the
//!   one that was saved
//! - **Release integrity**: every pending release survives exactly once
//! - **Config matching**: state can only be loaded with the config it was
//!   saved under

use crate::engine::EngineStats;
use crate::events::CapacityRelease;
use crate::network::NetworkError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use thiserror::Error;

/// Checkpoint save/restore errors
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint was taken with a different config (expected hash {expected}, got {actual})")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Checkpoint serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checkpoint references unknown region: {0}")]
    UnknownRegion(String),

    #[error("Checkpoint node invalid: {0}")]
    Node(#[from] NetworkError),

    #[error("Pending release at {fire_at_ns} ns lies before checkpoint time {current_time_ns} ns")]
    ReleaseInPast { fire_at_ns: i64, current_time_ns: i64 },
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete simulator state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub current_time_ns: i64,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    pub regions: Vec<RegionSnapshot>,
    pub nodes: Vec<NodeSnapshot>,

    /// Epoch the next registered node will receive
    pub next_node_epoch: u64,

    /// In firing order
    pub pending_releases: Vec<CapacityRelease>,

    pub uplink_stats: EngineStats,
    pub downlink_stats: EngineStats,

    /// SHA256 hash of the config (for validation)
    pub config_hash: String,
}

/// Remaining capacity of one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub id: String,
    pub uplink_remaining: i64,
    pub downlink_remaining: i64,
}

/// One registered node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub epoch: u64,
    pub region_id: String,
    pub enabled: bool,
    pub max_uplink_bitrate: Option<i64>,
    pub max_downlink_bitrate: Option<i64>,
    pub uplink_remaining: i64,
    pub downlink_remaining: i64,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Deterministic SHA256 hash of a config
///
/// Object keys are sorted before hashing so the result does not depend on
/// field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, CheckpointError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical = canonicalize(serde_json::to_value(config)?);
    let json = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Check snapshot integrity before anything is restored
///
/// - hash matches the config in use
/// - every region exists in the config and appears once
/// - no pending release lies in the past
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    expected_hash: &str,
    known_regions: &BTreeSet<String>,
) -> Result<(), CheckpointError> {
    if snapshot.config_hash != expected_hash {
        return Err(CheckpointError::ConfigMismatch {
            expected: expected_hash.to_string(),
            actual: snapshot.config_hash.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    for region in &snapshot.regions {
        if !known_regions.contains(&region.id) || !seen.insert(region.id.as_str()) {
            return Err(CheckpointError::UnknownRegion(region.id.clone()));
        }
    }
    for node in &snapshot.nodes {
        if !known_regions.contains(&node.region_id) {
            return Err(CheckpointError::UnknownRegion(node.region_id.clone()));
        }
    }

    for release in &snapshot.pending_releases {
        if !known_regions.contains(&release.region_id) {
            return Err(CheckpointError::UnknownRegion(release.region_id.clone()));
        }
        if release.fire_at_ns < snapshot.current_time_ns {
            return Err(CheckpointError::ReleaseInPast {
                fire_at_ns: release.fire_at_ns,
                current_time_ns: snapshot.current_time_ns,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_config_hash_deterministic() {
        #[derive(Serialize)]
        struct TestConfig {
            value: i32,
            name: String,
        }

        let a = compute_config_hash(&TestConfig {
            value: 42,
            name: "test".to_string(),
        })
        .unwrap();
        let b = compute_config_hash(&TestConfig {
            value: 42,
            name: "test".to_string(),
        })
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_compute_config_hash_differs() {
        #[derive(Serialize)]
        struct TestConfig {
            value: i32,
        }

        let a = compute_config_hash(&TestConfig { value: 42 }).unwrap();
        let b = compute_config_hash(&TestConfig { value: 43 }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_rejects_release_in_past() {
        let snapshot = StateSnapshot {
            current_time_ns: 100,
            rng_state: 1,
            regions: vec![],
            nodes: vec![],
            next_node_epoch: 0,
            pending_releases: vec![CapacityRelease {
                fire_at_ns: 50,
                direction: crate::models::TransmissionDirection::UplinkUnicast,
                region_id: "global".to_string(),
                node_id: None,
                node_epoch: None,
                amount_bps: 1,
            }],
            uplink_stats: EngineStats::default(),
            downlink_stats: EngineStats::default(),
            config_hash: "h".to_string(),
        };
        let regions: BTreeSet<String> = ["global".to_string()].into_iter().collect();

        assert!(matches!(
            validate_snapshot(&snapshot, "h", &regions),
            Err(CheckpointError::ReleaseInPast { fire_at_ns: 50, .. })
        ));
        assert!(matches!(
            validate_snapshot(&snapshot, "other", &regions),
            Err(CheckpointError::ConfigMismatch { .. })
        ));
    }
}
