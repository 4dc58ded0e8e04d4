//! Caching for the Iris image browser.
//!
//! This crate bounds the memory an Iris session spends on decoded images
//! and memoized queries:
//!
//! - **LRU store**: fixed-capacity key-value cache with O(1) operations
//!   and strict recency-based eviction, for thumbnails and decoded images
//! - **Operation cache**: memoization for named deferred computations and
//!   parameterized filter/sort results, bounded by a single shared
//!   insertion-order (FIFO) ledger, plus unbounded per-file metadata
//!   side-caches
//! - **View state**: explicit side table of transient per-file UI flags
//! - **Stats**: atomic hit/miss/eviction counters
//!
//! The two eviction policies are intentionally different and kept apart:
//! the LRU store rescues entries on access, the operation cache never
//! does.
//!
//! # Example
//!
//! ```rust
//! use iris_cache::lru::LruCache;
//!
//! let mut cache = LruCache::new(100).unwrap();
//! cache.insert("/photos/a.jpg", vec![0u8; 16]);
//! assert!(cache.get(&"/photos/a.jpg").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lru;
pub mod operation_cache;
pub mod stats;
pub mod view_state;

pub use lru::{LruCache, SyncLruCache};
pub use operation_cache::{OperationCache, OperationCacheConfig, ParamKey};
pub use stats::CacheStats;
pub use view_state::{ViewState, ViewStateMap};
