//! Memoization cache for collection queries.
//!
//! This module caches the expensive work an image-collection view repeats:
//! named deferred operations (so concurrent requesters share one in-flight
//! computation instead of racing to start their own), parameterized
//! filter/sort/lookup results, and two per-file metadata side-caches.
//!
//! The named-operation and parameterized maps are bounded jointly: one
//! insertion-order ledger spans both, and overflow evicts the globally
//! oldest entry first, whichever map it lives in. This is deliberately
//! FIFO rather than LRU; reading an entry never rescues it. The metadata
//! side-caches are unbounded and cleared only explicitly, since they track
//! the working set of currently-loaded files.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use iris_common::constants::DEFAULT_OPERATION_ENTRIES;
use iris_common::error::{CacheError, CacheResult};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::stats::CacheStats;

/// Operation type under which filter results are cached.
pub const FILTER_OPERATION: &str = "filter";

/// Operation type under which sort results are cached.
pub const SORT_OPERATION: &str = "sort";

/// Composite key for a parameterized cache entry.
///
/// Keeping the operation type and parameter signature as separate fields
/// makes the key unambiguous by construction: `("A", "BC")` and
/// `("AB", "C")` can never collide the way a naive concatenation would.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKey {
    operation: String,
    signature: String,
}

impl ParamKey {
    /// Creates a key from an operation type and a parameter signature.
    pub fn new(operation: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            signature: signature.into(),
        }
    }

    /// Returns the operation type component.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the parameter signature component.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.signature)
    }
}

/// Configuration for the operation cache.
#[derive(Debug, Clone)]
pub struct OperationCacheConfig {
    /// Combined entry limit across named operations and parameterized
    /// results. Metadata side-caches are not counted.
    pub max_entries: usize,
}

impl Default for OperationCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_OPERATION_ENTRIES,
        }
    }
}

impl OperationCacheConfig {
    /// Creates a config with the given combined entry limit.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self { max_entries }
    }
}

/// A ledger slot naming an entry in one of the two bounded maps.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Operation(String),
    Keyed(ParamKey),
}

struct Inner<H> {
    /// Named deferred computations, keyed by operation name.
    operations: HashMap<String, H>,
    /// Parameterized results, type-erased so one cache serves every
    /// result shape the view layer produces.
    keyed: HashMap<ParamKey, Arc<dyn Any + Send + Sync>>,
    /// Global insertion order across both bounded maps; the front is the
    /// next eviction victim.
    ledger: VecDeque<Slot>,
    /// Whether a file has an associated prompt/metadata marker.
    prompt_flags: HashMap<String, bool>,
    /// Tags attached to a file, in display order.
    tag_lists: HashMap<String, Vec<String>>,
}

impl<H> Inner<H> {
    /// Pops ledger slots until the bounded maps fit `max_entries`.
    fn evict_overflow(&mut self, max_entries: usize, stats: &CacheStats) {
        while self.ledger.len() > max_entries {
            let Some(slot) = self.ledger.pop_front() else {
                break;
            };
            stats.record_eviction();
            match &slot {
                Slot::Operation(name) => {
                    debug!(%name, "evicting oldest operation");
                    self.operations.remove(name);
                }
                Slot::Keyed(key) => {
                    debug!(%key, "evicting oldest result");
                    self.keyed.remove(key);
                }
            }
        }
    }

    /// Drops the ledger slot for an entry removed out of band.
    fn forget(&mut self, slot: &Slot) {
        if let Some(pos) = self.ledger.iter().position(|s| s == slot) {
            self.ledger.remove(pos);
        }
    }
}

/// Memoization cache for an image-collection session.
///
/// `H` is the caller's handle type for a deferred computation, typically
/// an `Arc` of a lazily-evaluated producer or a shared future. The cache
/// stores and hands back handles; it never invokes, cancels, or retries
/// them. Evicting a handle only drops the cache's reference, and a handle
/// whose computation later fails stays cached until the caller removes it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use iris_cache::operation_cache::{OperationCache, OperationCacheConfig};
///
/// let cache: OperationCache<Arc<Vec<String>>> =
///     OperationCache::new(OperationCacheConfig::default()).unwrap();
///
/// let listing = Arc::new(vec!["a.jpg".to_string()]);
/// cache.insert_operation("list-rated", Arc::clone(&listing));
///
/// let shared = cache.get_operation("list-rated").unwrap();
/// assert!(Arc::ptr_eq(&shared, &listing));
/// ```
pub struct OperationCache<H> {
    max_entries: usize,
    inner: RwLock<Inner<H>>,
    stats: CacheStats,
}

impl<H: Clone> OperationCache<H> {
    /// Creates an operation cache with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfiguration`] when `max_entries` is
    /// zero.
    pub fn new(config: OperationCacheConfig) -> CacheResult<Self> {
        if config.max_entries == 0 {
            return Err(CacheError::invalid_configuration(
                "operation cache max_entries must be positive",
            ));
        }
        Ok(Self {
            max_entries: config.max_entries,
            inner: RwLock::new(Inner {
                operations: HashMap::new(),
                keyed: HashMap::new(),
                ledger: VecDeque::new(),
                prompt_flags: HashMap::new(),
                tag_lists: HashMap::new(),
            }),
            stats: CacheStats::new(),
        })
    }

    /// Returns the combined number of named operations and parameterized
    /// results, the count eviction decisions are made against.
    pub fn len(&self) -> usize {
        self.inner.read().ledger.len()
    }

    /// Returns true when no bounded entries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the combined entry limit.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the hit/miss/eviction counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Stores a deferred computation handle under `name`.
    ///
    /// A new name appends to the insertion ledger and may evict the
    /// globally oldest entry; re-inserting an existing name replaces the
    /// handle in place and keeps its original ledger position.
    pub fn insert_operation(&self, name: impl Into<String>, handle: H) {
        let name = name.into();
        self.stats.record_insert();

        let mut inner = self.inner.write();
        if inner.operations.insert(name.clone(), handle).is_none() {
            trace!(%name, "caching operation");
            inner.ledger.push_back(Slot::Operation(name));
            inner.evict_overflow(self.max_entries, &self.stats);
        }
    }

    /// Returns the handle stored under `name`, if it is still cached.
    ///
    /// The handle comes back cloned and is never invoked here; concurrent
    /// callers that receive the same handle share one in-flight
    /// computation.
    pub fn get_operation(&self, name: &str) -> Option<H> {
        self.stats.record_access();

        let inner = self.inner.read();
        match inner.operations.get(name) {
            Some(handle) => {
                self.stats.record_hit();
                Some(handle.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Returns the handle under `name`, inserting the one produced by
    /// `make` if absent.
    ///
    /// Check and insert happen under a single write-lock acquisition, so
    /// the second of two racing callers always observes the first caller's
    /// handle rather than constructing a duplicate.
    pub fn get_or_insert_operation(&self, name: &str, make: impl FnOnce() -> H) -> H {
        self.stats.record_access();

        let mut inner = self.inner.write();
        if let Some(handle) = inner.operations.get(name) {
            self.stats.record_hit();
            return handle.clone();
        }

        self.stats.record_miss();
        self.stats.record_insert();
        let handle = make();
        inner.operations.insert(name.to_string(), handle.clone());
        inner.ledger.push_back(Slot::Operation(name.to_string()));
        inner.evict_overflow(self.max_entries, &self.stats);
        handle
    }

    /// Removes the handle stored under `name`; no-op when absent.
    pub fn remove_operation(&self, name: &str) {
        let mut inner = self.inner.write();
        if inner.operations.remove(name).is_some() {
            let slot = Slot::Operation(name.to_string());
            inner.forget(&slot);
        }
    }

    /// Stores a parameterized result under `(operation, signature)`.
    ///
    /// Values are type-erased; retrieve with [`get_value`](Self::get_value)
    /// at the same type. Shares the insertion ledger and entry limit with
    /// named operations.
    pub fn insert_value<T: Send + Sync + 'static>(
        &self,
        operation: impl Into<String>,
        signature: impl Into<String>,
        value: T,
    ) {
        let key = ParamKey::new(operation, signature);
        self.stats.record_insert();

        let mut inner = self.inner.write();
        if inner.keyed.insert(key.clone(), Arc::new(value)).is_none() {
            trace!(%key, "caching result");
            inner.ledger.push_back(Slot::Keyed(key));
            inner.evict_overflow(self.max_entries, &self.stats);
        }
    }

    /// Returns the result stored under `(operation, signature)`.
    ///
    /// A missing entry and an entry stored at a different type both report
    /// a miss.
    pub fn get_value<T: Send + Sync + 'static>(
        &self,
        operation: &str,
        signature: &str,
    ) -> Option<Arc<T>> {
        self.stats.record_access();

        let key = ParamKey::new(operation, signature);
        let inner = self.inner.read();
        let found = inner
            .keyed
            .get(&key)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok());

        match found {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Removes every parameterized result whose operation type matches.
    ///
    /// Named operations and the metadata side-caches are untouched.
    pub fn invalidate(&self, operation: &str) {
        let mut inner = self.inner.write();
        let doomed: Vec<ParamKey> = inner
            .keyed
            .keys()
            .filter(|key| key.operation() == operation)
            .cloned()
            .collect();

        debug!(operation, count = doomed.len(), "invalidating results");
        for key in doomed {
            inner.keyed.remove(&key);
            inner.forget(&Slot::Keyed(key));
        }
    }

    /// Removes all parameterized results.
    ///
    /// Named operations and the metadata side-caches survive; callers
    /// wanting a full reset clear each sub-cache explicitly.
    pub fn clear_values(&self) {
        let mut inner = self.inner.write();
        debug!(count = inner.keyed.len(), "clearing cached results");
        inner.keyed.clear();
        inner.ledger.retain(|slot| matches!(slot, Slot::Operation(_)));
    }

    /// Records whether a file has an associated prompt marker.
    pub fn set_prompt_flag(&self, path: impl Into<String>, has_prompt: bool) {
        self.inner.write().prompt_flags.insert(path.into(), has_prompt);
    }

    /// Returns the recorded prompt flag for a file, if any.
    pub fn prompt_flag(&self, path: &str) -> Option<bool> {
        self.inner.read().prompt_flags.get(path).copied()
    }

    /// Records the tag list for a file.
    pub fn set_tags(&self, path: impl Into<String>, tags: Vec<String>) {
        self.inner.write().tag_lists.insert(path.into(), tags);
    }

    /// Returns the recorded tag list for a file, if any.
    pub fn tags(&self, path: &str) -> Option<Vec<String>> {
        self.inner.read().tag_lists.get(path).cloned()
    }

    /// Drops both metadata side-caches.
    pub fn clear_metadata(&self) {
        let mut inner = self.inner.write();
        debug!(
            prompts = inner.prompt_flags.len(),
            tags = inner.tag_lists.len(),
            "clearing metadata caches"
        );
        inner.prompt_flags.clear();
        inner.tag_lists.clear();
    }

    /// Caches a filter result for the given minimum rating.
    pub fn cache_filter_result<T: Send + Sync + 'static>(&self, rating: u8, results: T) {
        self.insert_value(FILTER_OPERATION, rating.to_string(), results);
    }

    /// Returns the cached filter result for the given minimum rating.
    pub fn cached_filter_result<T: Send + Sync + 'static>(&self, rating: u8) -> Option<Arc<T>> {
        self.get_value(FILTER_OPERATION, &rating.to_string())
    }

    /// Caches a sort result for the given criteria.
    pub fn cache_sort_result<T: Send + Sync + 'static>(
        &self,
        by_date: bool,
        ascending: bool,
        results: T,
    ) {
        self.insert_value(SORT_OPERATION, sort_signature(by_date, ascending), results);
    }

    /// Returns the cached sort result for the given criteria.
    pub fn cached_sort_result<T: Send + Sync + 'static>(
        &self,
        by_date: bool,
        ascending: bool,
    ) -> Option<Arc<T>> {
        self.get_value(SORT_OPERATION, &sort_signature(by_date, ascending))
    }
}

/// Signature distinguishing all four sort-criteria combinations.
fn sort_signature(by_date: bool, ascending: bool) -> String {
    format!("date={by_date},asc={ascending}")
}
