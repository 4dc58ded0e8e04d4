//! System-wide default constants.

/// Default capacity of the thumbnail LRU store, in entries.
pub const DEFAULT_THUMBNAIL_CAPACITY: usize = 512;

/// Default capacity of the full-size image LRU store, in entries.
///
/// Decoded full-size images are large, so the default is deliberately
/// small; the store bounds resident memory, not disk.
pub const DEFAULT_IMAGE_CAPACITY: usize = 32;

/// Default combined entry limit for the operation-result cache.
pub const DEFAULT_OPERATION_ENTRIES: usize = 256;
