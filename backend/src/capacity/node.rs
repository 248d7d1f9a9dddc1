//! Node-level capacity checks and bookkeeping
//!
//! Multicast never consults the node: every check below returns `true` for
//! `DownlinkMulticast` whatever record (or none) is passed in.

use crate::models::{NodeCapacity, TransmissionDirection};
use tracing::{trace, warn};

/// Node has at least `needed_bps` left in the direction
pub fn is_sufficient(
    direction: TransmissionDirection,
    node: Option<&NodeCapacity>,
    needed_bps: i64,
) -> bool {
    if !direction.uses_node_capacity() {
        return true;
    }
    match node {
        Some(node) => node.remaining(direction) >= needed_bps,
        None => {
            warn!(%direction, "cannot check node capacity: node record missing");
            false
        }
    }
}

/// Node has strictly positive capacity left in the direction
pub fn is_available(direction: TransmissionDirection, node: Option<&NodeCapacity>) -> bool {
    if !direction.uses_node_capacity() {
        return true;
    }
    match node {
        Some(node) => node.remaining(direction) > 0,
        None => {
            warn!(%direction, "cannot check node availability: node record missing");
            false
        }
    }
}

pub(crate) fn consume(node: &mut NodeCapacity, direction: TransmissionDirection, amount: i64) {
    node.pool_mut(direction).consume(amount);
    trace!(
        node = node.node_id(),
        %direction,
        amount,
        remaining = node.remaining(direction),
        "consumed node capacity"
    );
}

pub(crate) fn free(node: &mut NodeCapacity, direction: TransmissionDirection, amount: i64) {
    node.pool_mut(direction).free(amount);
    trace!(
        node = node.node_id(),
        %direction,
        amount,
        remaining = node.remaining(direction),
        "freed node capacity"
    );
}
