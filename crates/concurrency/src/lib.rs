//! Sharded concurrent score accumulation
//!
//! This crate provides [`ConcurrentScoreMap`], a lock-partitioned
//! `DocumentId -> f64` mapping used by the parallel relevance path. Many
//! rayon workers increment or erase per-document scores concurrently with
//! bounded contention; a consistent point-in-time snapshot turns the shards
//! back into one ordinary ordered map.
//!
//! # Design
//!
//! - Fixed number of shards chosen at construction, each an
//!   `FxHashMap` behind its own `parking_lot::Mutex`
//! - A key routes to shard `key mod N`; document ids are validated
//!   non-negative before they reach the accumulator, so routing is stable
//! - Snapshot acquires every shard lock in ascending shard order, the one
//!   fixed global order, so concurrent snapshots cannot deadlock
//!
//! # Concurrency contract
//!
//! Increments to the same key serialize on that key's shard lock and
//! commute, so the accumulated value is independent of worker arrival
//! order. There is no ordering guarantee between operations on different
//! keys. Callers that need "erase takes effect after all increments" (the
//! relevance engine does) must sequence the two fan-outs themselves.

#![warn(missing_docs)]
#![warn(clippy::all)]

use docrank_core::DocumentId;
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Default shard count used by the relevance engine.
///
/// Sixteen-way sharding matches the default of the dashmap-backed stores
/// this accumulator sits beside; contention on typical corpora is already
/// negligible at this width.
pub const DEFAULT_SHARD_COUNT: usize = 16;

type Shard = FxHashMap<DocumentId, f64>;

/// Lock-partitioned `DocumentId -> f64` accumulator.
///
/// # Example
///
/// ```
/// use docrank_concurrency::ConcurrentScoreMap;
///
/// let scores = ConcurrentScoreMap::new(4);
/// scores.access(7).add(0.25);
/// scores.access(7).add(0.25);
/// assert_eq!(scores.snapshot().get(&7), Some(&0.5));
/// ```
pub struct ConcurrentScoreMap {
    shards: Vec<Mutex<Shard>>,
}

impl ConcurrentScoreMap {
    /// Create an accumulator with `shard_count` independent shards.
    ///
    /// A count of zero is clamped to one shard (a single-lock map is still
    /// correct, just fully serialized).
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        ConcurrentScoreMap {
            shards: (0..shard_count).map(|_| Mutex::new(Shard::default())).collect(),
        }
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, key: DocumentId) -> usize {
        debug_assert!(key >= 0, "document ids are validated non-negative");
        key.rem_euclid(self.shards.len() as i64) as usize
    }

    /// Lock the shard owning `key` and return a guard for its slot.
    ///
    /// The slot is created at 0.0 if absent. The shard stays locked for the
    /// lifetime of the returned [`ScoreSlot`] and is released when it drops,
    /// on every exit path.
    pub fn access(&self, key: DocumentId) -> ScoreSlot<'_> {
        let mut guard = self.shards[self.shard_index(key)].lock();
        guard.entry(key).or_insert(0.0);
        ScoreSlot { guard, key }
    }

    /// Remove `key` if present, locking only its owning shard.
    pub fn erase(&self, key: DocumentId) {
        self.shards[self.shard_index(key)].lock().remove(&key);
    }

    /// Merge all shards into one ordinary ordered map.
    ///
    /// Every shard lock is acquired in ascending shard order and held until
    /// the merge completes, so the result is a consistent point-in-time
    /// view. Blocks until all locks are available.
    pub fn snapshot(&self) -> BTreeMap<DocumentId, f64> {
        let guards: Vec<MutexGuard<'_, Shard>> =
            self.shards.iter().map(|shard| shard.lock()).collect();
        let mut merged = BTreeMap::new();
        for guard in &guards {
            for (&id, &score) in guard.iter() {
                merged.insert(id, score);
            }
        }
        merged
    }
}

/// Scoped handle to one key's accumulator slot.
///
/// Holds the owning shard's lock; dropping the slot releases it.
pub struct ScoreSlot<'a> {
    guard: MutexGuard<'a, Shard>,
    key: DocumentId,
}

impl ScoreSlot<'_> {
    /// Mutable reference to the slot's value.
    pub fn value(&mut self) -> &mut f64 {
        // Slot was created in `access`; entry() keeps this total without
        // an unwrap.
        self.guard.entry(self.key).or_insert(0.0)
    }

    /// Add `delta` to the slot.
    pub fn add(mut self, delta: f64) {
        *self.value() += delta;
    }

    /// Current value of the slot.
    pub fn get(&self) -> f64 {
        self.guard.get(&self.key).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_clamps_zero_shards() {
        let map = ConcurrentScoreMap::new(0);
        assert_eq!(map.shard_count(), 1);
        map.access(0).add(1.0);
        assert_eq!(map.snapshot().get(&0), Some(&1.0));
    }

    #[test]
    fn test_access_creates_slot_at_zero() {
        let map = ConcurrentScoreMap::new(4);
        assert_eq!(map.access(3).get(), 0.0);
        assert_eq!(map.snapshot().get(&3), Some(&0.0));
    }

    #[test]
    fn test_accumulate_and_erase() {
        let map = ConcurrentScoreMap::new(4);
        map.access(1).add(0.5);
        map.access(1).add(0.25);
        map.access(2).add(1.0);
        map.erase(1);

        let snap = map.snapshot();
        assert!(!snap.contains_key(&1));
        assert_eq!(snap.get(&2), Some(&1.0));
    }

    #[test]
    fn test_erase_absent_key_is_noop() {
        let map = ConcurrentScoreMap::new(4);
        map.erase(99);
        assert!(map.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let map = ConcurrentScoreMap::new(3);
        for id in [5, 1, 17, 2] {
            map.access(id).add(1.0);
        }
        let ids: Vec<_> = map.snapshot().keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 5, 17]);
    }

    #[test]
    fn test_concurrent_increments_sum_exactly() {
        let map = Arc::new(ConcurrentScoreMap::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for id in 0..100 {
                        map.access(id).add(1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snap = map.snapshot();
        assert_eq!(snap.len(), 100);
        for id in 0..100 {
            assert_eq!(snap.get(&id), Some(&8.0), "id {}", id);
        }
    }

    #[test]
    fn test_concurrent_snapshot_does_not_deadlock() {
        let map = Arc::new(ConcurrentScoreMap::new(8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for i in 0..200 {
                        if (i + t) % 3 == 0 {
                            let _ = map.snapshot();
                        } else {
                            map.access(i).add(0.5);
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_same_key_routes_to_same_shard() {
        let map = ConcurrentScoreMap::new(7);
        // Increments through separately obtained slots must hit one slot.
        for _ in 0..10 {
            map.access(13).add(1.0);
        }
        assert_eq!(map.snapshot().get(&13), Some(&10.0));
    }
}
