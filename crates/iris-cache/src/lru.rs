//! Bounded LRU store for decoded images and thumbnails.
//!
//! A classic least-recently-used cache with O(1) get, insert, and
//! eviction. A `HashMap` gives O(1) key lookup and an intrusive
//! doubly-linked list maintains recency order, head = most recently used,
//! tail = next to evict.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::ptr::NonNull;

use iris_common::error::{CacheError, CacheResult};
use parking_lot::Mutex;

use crate::stats::CacheStats;

/// A node in the recency list.
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<NonNull<Node<K, V>>>,
    next: Option<NonNull<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }
}

/// A fixed-capacity key-value store with strict LRU eviction.
///
/// `get` promotes the entry it returns; `contains` is the one read that
/// leaves recency order untouched, so prefetch scans can probe for
/// presence without disturbing eviction order.
///
/// # Example
///
/// ```
/// use iris_cache::lru::LruCache;
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // Inserting a third entry evicts "b", now the least recently used
/// cache.insert("c", 3);
/// assert_eq!(cache.get(&"b"), None);
/// ```
pub struct LruCache<K, V> {
    /// Maximum number of resident entries, fixed at construction.
    capacity: usize,
    /// Map from key to list node.
    map: HashMap<K, NonNull<Node<K, V>>>,
    /// Most recently used entry.
    head: Option<NonNull<Node<K, V>>>,
    /// Least recently used entry.
    tail: Option<NonNull<Node<K, V>>>,
    /// Hit/miss/eviction counters.
    stats: CacheStats,
}

// Safety: the cache owns every node it points at and hands out no aliases
unsafe impl<K: Send, V: Send> Send for LruCache<K, V> {}
unsafe impl<K: Send + Sync, V: Send + Sync> Sync for LruCache<K, V> {}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Creates a store holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] when `capacity` is
    /// zero; a store that can hold nothing cannot satisfy its contract.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        if capacity == 0 {
            return Err(CacheError::invalid_configuration(
                "LRU capacity must be positive",
            ));
        }
        Ok(Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
            stats: CacheStats::new(),
        })
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up a key and promotes it to most recently used.
    ///
    /// This is a mutating read: a hit reorders the recency list.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.stats.record_access();

        if let Some(&node) = self.map.get(key) {
            self.stats.record_hit();
            self.move_to_front(node);
            // Safety: the pointer came out of the map, so the node is live
            Some(unsafe { &(*node.as_ptr()).value })
        } else {
            self.stats.record_miss();
            None
        }
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.stats.record_access();

        if let Some(&node) = self.map.get(key) {
            self.stats.record_hit();
            self.move_to_front(node);
            // Safety: the pointer came out of the map, so the node is live
            Some(unsafe { &mut (*node.as_ptr()).value })
        } else {
            self.stats.record_miss();
            None
        }
    }

    /// Checks for presence without touching recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts or updates an entry, returning the previous value if the
    /// key was already present.
    ///
    /// An update overwrites in place and promotes the key without changing
    /// `len`. A new key at capacity first evicts exactly one entry, the
    /// current tail. Either way the touched key ends up most recently
    /// used.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.stats.record_insert();

        if let Some(&node) = self.map.get(&key) {
            self.move_to_front(node);
            // Safety: the pointer came out of the map, so the node is live
            let old = unsafe { std::mem::replace(&mut (*node.as_ptr()).value, value) };
            return Some(old);
        }

        if self.map.len() >= self.capacity {
            self.evict_lru();
        }

        let node = Box::new(Node::new(key.clone(), value));
        // Safety: Box::into_raw never returns null
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(node)) };

        self.push_front(node);
        self.map.insert(key, node);

        None
    }

    /// Removes an entry, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.map.remove(key)?;
        self.unlink(node);
        // Safety: the node left the map above, so this is the only owner
        let node = unsafe { Box::from_raw(node.as_ptr()) };
        Some(node.value)
    }

    /// Returns the resident keys, most recently used first.
    ///
    /// The result is a snapshot for diagnostics and tests, not a live
    /// view; taking it does not alter recency order.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut current = self.head;
        while let Some(node) = current {
            // Safety: list nodes are owned by the cache and live until unlinked
            unsafe {
                keys.push((*node.as_ptr()).key.clone());
                current = (*node.as_ptr()).next;
            }
        }
        keys
    }

    /// Drops every entry; `len` becomes zero.
    pub fn clear(&mut self) {
        let mut current = self.head;
        while let Some(node) = current {
            unsafe {
                current = (*node.as_ptr()).next;
                drop(Box::from_raw(node.as_ptr()));
            }
        }
        self.map.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns the hit/miss/eviction counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn move_to_front(&mut self, node: NonNull<Node<K, V>>) {
        if Some(node) == self.head {
            return;
        }
        self.unlink(node);
        self.push_front(node);
    }

    fn push_front(&mut self, node: NonNull<Node<K, V>>) {
        unsafe {
            (*node.as_ptr()).prev = None;
            (*node.as_ptr()).next = self.head;

            if let Some(head) = self.head {
                (*head.as_ptr()).prev = Some(node);
            }

            self.head = Some(node);

            if self.tail.is_none() {
                self.tail = Some(node);
            }
        }
    }

    fn unlink(&mut self, node: NonNull<Node<K, V>>) {
        unsafe {
            let prev = (*node.as_ptr()).prev;
            let next = (*node.as_ptr()).next;

            if let Some(prev) = prev {
                (*prev.as_ptr()).next = next;
            } else {
                self.head = next;
            }

            if let Some(next) = next {
                (*next.as_ptr()).prev = prev;
            } else {
                self.tail = prev;
            }
        }
    }

    /// Evicts the tail, the least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(tail) = self.tail {
            self.stats.record_eviction();
            // Safety: tail is live until removed
            let key = unsafe { (*tail.as_ptr()).key.clone() };
            self.remove(&key);
        }
    }
}

impl<K, V> Drop for LruCache<K, V> {
    fn drop(&mut self) {
        let mut current = self.head;
        while let Some(node) = current {
            unsafe {
                current = (*node.as_ptr()).next;
                drop(Box::from_raw(node.as_ptr()));
            }
        }
    }
}

/// A `Mutex`-guarded [`LruCache`] for use across threads.
///
/// The image loader mutates this from a background decode task while the
/// view thread probes it, so every operation takes the lock for its whole
/// duration and values come back cloned.
pub struct SyncLruCache<K, V> {
    inner: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> SyncLruCache<K, V> {
    /// Creates a synchronized store with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        Ok(Self {
            inner: Mutex::new(LruCache::new(capacity)?),
        })
    }

    /// Looks up a key, promoting it on a hit.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Checks for presence without touching recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Inserts or updates an entry.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Removes an entry.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Returns the resident keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys()
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut cache = LruCache::new(3).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            LruCache::<String, u32>::new(0),
            Err(CacheError::InvalidConfiguration { .. })
        ));
        assert!(SyncLruCache::<String, u32>::new(0).is_err());
    }

    #[test]
    fn test_eviction_is_least_recently_used() {
        let mut cache = LruCache::new(2).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3); // evicts "a"

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity_plus_one_keeps_capacity_resident() {
        let mut cache = LruCache::new(4).unwrap();
        for i in 0..5 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 4);
        assert!(!cache.contains(&0));
        for i in 1..5 {
            assert!(cache.contains(&i));
        }
    }

    #[test]
    fn test_get_promotes() {
        let mut cache = LruCache::new(2).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);

        // "a" becomes most recent, so the next eviction takes "b"
        cache.get(&"a");
        cache.insert("c", 3);

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_contains_does_not_promote() {
        let mut cache = LruCache::new(2).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);

        // Probing the LRU entry repeatedly must not rescue it
        for _ in 0..5 {
            assert!(cache.contains(&"a"));
        }
        cache.insert("c", 3);

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
    }

    #[test]
    fn test_update_existing_keeps_len() {
        let mut cache = LruCache::new(2).unwrap();

        cache.insert("a", 1);
        let old = cache.insert("a", 10);

        assert_eq!(old, Some(1));
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_most_recent_first() {
        let mut cache = LruCache::new(3).unwrap();

        cache.insert("one", 1);
        cache.insert("two", 2);
        cache.insert("three", 3);
        cache.get(&"one");

        assert_eq!(cache.keys(), vec!["one", "three", "two"]);
    }

    #[test]
    fn test_remove() {
        let mut cache = LruCache::new(3).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), None);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = LruCache::new(3).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), None);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_sliding_window_scenario() {
        // Capacity 5, insert 1..=10: after every insert the resident set
        // is the 5 most recent, most recent first.
        let mut cache = LruCache::new(5).unwrap();

        for i in 1..=10 {
            cache.insert(i, i * 100);

            let expected: Vec<i32> = (1..=i).rev().take(5).collect();
            assert_eq!(cache.keys(), expected);
            assert_eq!(cache.len(), expected.len());
        }
    }

    #[test]
    fn test_statistics() {
        let mut cache = LruCache::new(2).unwrap();

        cache.insert("a", 1);
        cache.get(&"a"); // hit
        cache.get(&"b"); // miss
        cache.insert("b", 2);
        cache.insert("c", 3); // eviction

        let stats = cache.stats();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.evictions(), 1);
        assert_eq!(stats.inserts(), 3);
    }

    #[test]
    fn test_sync_cache() {
        let cache = SyncLruCache::new(2).unwrap();

        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"c"), None);
        assert!(cache.contains(&"b"));
        assert_eq!(cache.keys(), vec!["a", "b"]);

        cache.clear();
        assert!(cache.is_empty());
    }
}
