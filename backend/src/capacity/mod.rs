//! Capacity pools
//!
//! Combined region + node operations used by the transmission engine and by
//! release events. Unicast consults both the region and the node pool;
//! downlink multicast consults the region only.
//!
//! # Critical Invariants
//!
//! 1. **Symmetry**: `free(x)` after `consume(x)` on the same tuple restores
//!    the counters exactly, however negative they went in between
//! 2. **Negative amounts are no-ops** for both `consume` and `free`
//! 3. **No clamping**: counters may go below zero and above their maximum

pub mod math;
pub mod node;
pub mod region;

pub use math::{needed_bandwidth, needed_delay};

use crate::models::{NodeCapacity, Region, TransmissionDirection};
use tracing::warn;

/// Both relevant pools can carry `needed_bps`
///
/// Missing region → `false`. Missing node → `false` for unicast, ignored for
/// multicast.
pub fn is_sufficient(
    direction: TransmissionDirection,
    region: Option<&Region>,
    node: Option<&NodeCapacity>,
    needed_bps: i64,
) -> bool {
    region::is_sufficient(direction, region, needed_bps)
        && node::is_sufficient(direction, node, needed_bps)
}

/// Reserve `amount` bps on the relevant pools
///
/// All or nothing: when a required pool is missing nothing is consumed.
pub fn consume(
    direction: TransmissionDirection,
    region: Option<&mut Region>,
    node: Option<&mut NodeCapacity>,
    amount: i64,
) {
    if amount < 0 {
        warn!(%direction, amount, "ignoring consume of negative amount");
        return;
    }
    let Some(region) = region else {
        warn!(%direction, amount, "cannot consume capacity: region missing");
        return;
    };
    if direction.uses_node_capacity() {
        let Some(node) = node else {
            warn!(%direction, amount, "cannot consume capacity: node record missing");
            return;
        };
        node::consume(node, direction, amount);
    }
    region::consume(region, direction, amount);
}

/// Return `amount` bps to the relevant pools
///
/// Frees the region even when the node record is gone; a node that left the
/// simulation has nothing to get back.
pub fn free(
    direction: TransmissionDirection,
    region: Option<&mut Region>,
    node: Option<&mut NodeCapacity>,
    amount: i64,
) {
    if amount < 0 {
        warn!(%direction, amount, "ignoring free of negative amount");
        return;
    }
    match region {
        Some(region) => region::free(region, direction, amount),
        None => warn!(%direction, amount, "cannot free region capacity: region missing"),
    }
    if direction.uses_node_capacity() {
        match node {
            Some(node) => node::free(node, direction, amount),
            None => warn!(%direction, amount, "cannot free node capacity: node record missing"),
        }
    }
}

/// Relevant pools all have strictly positive capacity left
pub fn is_available(
    direction: TransmissionDirection,
    region: Option<&Region>,
    node: Option<&NodeCapacity>,
) -> bool {
    region::is_available(direction, region) && node::is_available(direction, node)
}

/// Bandwidth a transmission could grab right now
///
/// Unicast: `min(region, node)`. Multicast: region only. `0` if a required
/// input is missing.
pub fn available_amount(
    direction: TransmissionDirection,
    region: Option<&Region>,
    node: Option<&NodeCapacity>,
) -> i64 {
    let Some(region) = region else {
        return 0;
    };
    let region_remaining = region.remaining(direction);
    if !direction.uses_node_capacity() {
        return region_remaining;
    }
    match node {
        Some(node) => region_remaining.min(node.remaining(direction)),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmission::{ChannelProperties, DelayModel, RegionProperties};

    fn region(up: i64, down: i64) -> Region {
        let props = RegionProperties::uniform(ChannelProperties::new(DelayModel::Constant {
            delay: 1_000_000,
        }));
        Region::new("r1", Some(up), Some(down), props)
    }

    fn node(up: i64, down: i64) -> NodeCapacity {
        NodeCapacity::new("n1", true).with_bitrates(Some(up), Some(down))
    }

    #[test]
    fn test_unicast_requires_both_pools() {
        let r = region(1_000, 1_000);
        let n = node(100, 100);
        let dir = TransmissionDirection::DownlinkUnicast;
        assert!(is_sufficient(dir, Some(&r), Some(&n), 100));
        assert!(!is_sufficient(dir, Some(&r), Some(&n), 101));
        assert!(!is_sufficient(dir, Some(&r), None, 1));
        assert!(!is_sufficient(dir, None, Some(&n), 1));
    }

    #[test]
    fn test_consume_without_node_is_noop_for_unicast() {
        let mut r = region(1_000, 1_000);
        consume(TransmissionDirection::UplinkUnicast, Some(&mut r), None, 300);
        assert_eq!(r.remaining(TransmissionDirection::UplinkUnicast), 1_000);
    }

    #[test]
    fn test_free_without_node_still_frees_region() {
        let mut r = region(1_000, 1_000);
        let mut n = node(500, 500);
        let dir = TransmissionDirection::UplinkUnicast;
        consume(dir, Some(&mut r), Some(&mut n), 300);
        free(dir, Some(&mut r), None, 300);
        assert_eq!(r.remaining(dir), 1_000);
        assert_eq!(n.remaining(dir), 200);
    }

    #[test]
    fn test_available_amount() {
        let r = region(1_000, 2_000);
        let n = node(700, 5_000);
        assert_eq!(
            available_amount(TransmissionDirection::UplinkUnicast, Some(&r), Some(&n)),
            700
        );
        assert_eq!(
            available_amount(TransmissionDirection::DownlinkUnicast, Some(&r), Some(&n)),
            2_000
        );
        assert_eq!(
            available_amount(TransmissionDirection::DownlinkMulticast, Some(&r), None),
            2_000
        );
        assert_eq!(
            available_amount(TransmissionDirection::DownlinkUnicast, Some(&r), None),
            0
        );
    }

    #[test]
    fn test_is_available_strictly_positive() {
        let r = region(0, 1);
        let dir = TransmissionDirection::DownlinkMulticast;
        assert!(is_available(dir, Some(&r), None));
        assert!(!is_available(TransmissionDirection::UplinkUnicast, Some(&r), Some(&node(5, 5))));
    }
}
