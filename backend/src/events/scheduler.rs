//! Time-ordered release scheduling
//!
//! Releases sit in a min-heap keyed by `(fire_at_ns, sequence)`. The sequence
//! number is assigned on insertion, so releases due at the same instant fire
//! in the order they were scheduled.

use crate::events::types::CapacityRelease;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Pending {
    fire_at_ns: i64,
    sequence: u64,
    release: CapacityRelease,
}

impl Pending {
    fn key(&self) -> (i64, u64) {
        (self.fire_at_ns, self.sequence)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed: BinaryHeap is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Pending capacity releases ordered by fire time
#[derive(Debug, Clone, Default)]
pub struct ReleaseScheduler {
    heap: BinaryHeap<Pending>,
    next_sequence: u64,
}

impl ReleaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a release; returns its sequence number
    pub fn schedule(&mut self, release: CapacityRelease) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Pending {
            fire_at_ns: release.fire_at_ns,
            sequence,
            release,
        });
        sequence
    }

    /// Fire time of the earliest pending release
    pub fn next_fire_time(&self) -> Option<i64> {
        self.heap.peek().map(|pending| pending.fire_at_ns)
    }

    /// Remove and return the earliest release if it is due at `now_ns`
    pub fn pop_due(&mut self, now_ns: i64) -> Option<CapacityRelease> {
        if self.next_fire_time()? > now_ns {
            return None;
        }
        self.heap.pop().map(|pending| pending.release)
    }

    /// Remove every release due at `now_ns`, in firing order
    pub fn drain_due(&mut self, now_ns: i64) -> Vec<CapacityRelease> {
        let mut due = Vec::new();
        while let Some(release) = self.pop_due(now_ns) {
            due.push(release);
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Snapshot of all pending releases in firing order
    pub fn pending(&self) -> Vec<CapacityRelease> {
        let mut pending: Vec<&Pending> = self.heap.iter().collect();
        pending.sort_by_key(|p| p.key());
        pending.into_iter().map(|p| p.release.clone()).collect()
    }
}
