//! Hit/miss counters for cache monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters recorded by the cache components.
///
/// All counters are relaxed atomics so recording never needs a lock and
/// readers can sample them through a shared reference.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Total lookups.
    accesses: AtomicU64,
    /// Lookups that found an entry.
    hits: AtomicU64,
    /// Lookups that found nothing.
    misses: AtomicU64,
    /// Insertions, including in-place updates.
    inserts: AtomicU64,
    /// Entries dropped to stay within a bound.
    evictions: AtomicU64,
}

impl CacheStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup.
    #[inline]
    pub fn record_access(&self) {
        self.accesses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that hit.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that missed.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an insertion.
    #[inline]
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an eviction.
    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns total lookups.
    pub fn accesses(&self) -> u64 {
        self.accesses.load(Ordering::Relaxed)
    }

    /// Returns lookup hits.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns lookup misses.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns insertions.
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Returns evictions.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Returns the fraction of lookups that hit, 0.0 when untouched.
    pub fn hit_ratio(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.hits() as f64 / accesses as f64
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.accesses.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            accesses: AtomicU64::new(self.accesses()),
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            inserts: AtomicU64::new(self.inserts()),
            evictions: AtomicU64::new(self.evictions()),
        }
    }
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "accesses: {}, hits: {}, misses: {}, hit ratio: {:.2}%, inserts: {}, evictions: {}",
            self.accesses(),
            self.hits(),
            self.misses(),
            self.hit_ratio() * 100.0,
            self.inserts(),
            self.evictions()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_and_ratio() {
        let stats = CacheStats::new();

        stats.record_access();
        stats.record_hit();
        stats.record_access();
        stats.record_miss();

        assert_eq!(stats.accesses(), 2);
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert!((stats.hit_ratio() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_empty_ratio_is_zero() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_reset() {
        let stats = CacheStats::new();

        stats.record_access();
        stats.record_hit();
        stats.record_eviction();
        stats.reset();

        assert_eq!(stats.accesses(), 0);
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.evictions(), 0);
    }

    #[test]
    fn test_clone_snapshots() {
        let stats = CacheStats::new();
        stats.record_access();
        stats.record_hit();

        let snapshot = stats.clone();
        stats.record_access();

        assert_eq!(snapshot.accesses(), 1);
        assert_eq!(stats.accesses(), 2);
    }
}
