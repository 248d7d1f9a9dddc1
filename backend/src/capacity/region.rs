//! Region-level capacity checks and bookkeeping

use crate::models::{Region, TransmissionDirection};
use tracing::{trace, warn};

/// Region has at least `needed_bps` left in the direction
pub fn is_sufficient(
    direction: TransmissionDirection,
    region: Option<&Region>,
    needed_bps: i64,
) -> bool {
    match region {
        Some(region) => region.remaining(direction) >= needed_bps,
        None => {
            warn!(%direction, "cannot check region capacity: region missing");
            false
        }
    }
}

/// Region has strictly positive capacity left in the direction
pub fn is_available(direction: TransmissionDirection, region: Option<&Region>) -> bool {
    match region {
        Some(region) => region.remaining(direction) > 0,
        None => {
            warn!(%direction, "cannot check region availability: region missing");
            false
        }
    }
}

pub(crate) fn consume(region: &mut Region, direction: TransmissionDirection, amount: i64) {
    region.pool_mut(direction).consume(amount);
    trace!(
        region = region.id(),
        %direction,
        amount,
        remaining = region.remaining(direction),
        "consumed region capacity"
    );
}

pub(crate) fn free(region: &mut Region, direction: TransmissionDirection, amount: i64) {
    region.pool_mut(direction).free(amount);
    trace!(
        region = region.id(),
        %direction,
        amount,
        remaining = region.remaining(direction),
        "freed region capacity"
    );
}
