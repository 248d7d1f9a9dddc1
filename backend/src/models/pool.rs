//! Link capacity pool
//!
//! One direction's worth of remaining bandwidth (bits per second).
//!
//! # Critical Invariants
//!
//! 1. **No clamping**: `remaining` may go negative under over-subscription
//! 2. **Unlimited pools are inert**: consume/free never change them
//! 3. **Mutation only via `crate::capacity`**: `consume`/`free` are crate-private

use serde::{Deserialize, Serialize};

/// Remaining capacity of one direction of a region or node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPool {
    /// Remaining bandwidth (bits/sec, signed)
    remaining: i64,

    /// Configured capacity, None for unlimited
    max: Option<i64>,
}

impl LinkPool {
    /// Pool starting at the given capacity
    pub fn limited(capacity: i64) -> Self {
        Self {
            remaining: capacity,
            max: Some(capacity),
        }
    }

    /// Pool without a capacity limit
    pub fn unlimited() -> Self {
        Self {
            remaining: i64::MAX,
            max: None,
        }
    }

    /// `Some(capacity)` → limited, `None` → unlimited
    pub fn from_capacity(capacity: Option<i64>) -> Self {
        capacity.map_or_else(Self::unlimited, Self::limited)
    }

    /// Remaining bandwidth (i64::MAX when unlimited)
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Configured capacity (None when unlimited)
    pub fn max(&self) -> Option<i64> {
        self.max
    }

    pub fn is_unlimited(&self) -> bool {
        self.max.is_none()
    }

    pub(crate) fn consume(&mut self, amount: i64) {
        if !self.is_unlimited() {
            self.remaining -= amount;
        }
    }

    pub(crate) fn free(&mut self, amount: i64) {
        if !self.is_unlimited() {
            self.remaining += amount;
        }
    }

    /// Overwrite the remaining value (checkpoint restore only)
    pub(crate) fn restore_remaining(&mut self, remaining: i64) {
        if !self.is_unlimited() {
            self.remaining = remaining;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_goes_negative() {
        let mut pool = LinkPool::limited(100);
        pool.consume(250);
        assert_eq!(pool.remaining(), -150);
        pool.free(250);
        assert_eq!(pool.remaining(), 100);
    }

    #[test]
    fn test_unlimited_is_inert() {
        let mut pool = LinkPool::unlimited();
        pool.consume(1_000);
        assert_eq!(pool.remaining(), i64::MAX);
        pool.free(1_000);
        assert_eq!(pool.remaining(), i64::MAX);
    }

    #[test]
    fn test_from_capacity() {
        assert!(LinkPool::from_capacity(None).is_unlimited());
        assert_eq!(LinkPool::from_capacity(Some(5)).max(), Some(5));
    }
}
