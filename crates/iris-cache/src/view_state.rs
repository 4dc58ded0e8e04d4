//! Per-file transient view state.
//!
//! The browser tracks small per-file flags (thumbnail decoded, preview
//! decoded) that exist only for the lifetime of the file's entry in a
//! collection view. They live here as an explicit path-keyed side table
//! owned by the same collection that owns the file list: entries are
//! removed when the file leaves the collection, or pruned in bulk against
//! the collection's current contents.

use std::collections::HashMap;

/// Transient flags for one file in a collection view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// Whether the file's thumbnail has been decoded.
    pub thumbnail_loaded: bool,
    /// Whether the file's full-size preview has been decoded.
    pub preview_loaded: bool,
}

/// Side table from file path to [`ViewState`].
///
/// # Example
///
/// ```
/// use iris_cache::view_state::ViewStateMap;
///
/// let mut states = ViewStateMap::new();
/// states.mark_thumbnail_loaded("/photos/a.jpg");
/// assert!(states.get("/photos/a.jpg").unwrap().thumbnail_loaded);
/// ```
#[derive(Debug, Default)]
pub struct ViewStateMap {
    states: HashMap<String, ViewState>,
}

impl ViewStateMap {
    /// Creates an empty side table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state recorded for a path, if any.
    pub fn get(&self, path: &str) -> Option<ViewState> {
        self.states.get(path).copied()
    }

    /// Replaces the state recorded for a path.
    pub fn set(&mut self, path: impl Into<String>, state: ViewState) {
        self.states.insert(path.into(), state);
    }

    /// Marks a path's thumbnail as decoded, creating the entry if needed.
    pub fn mark_thumbnail_loaded(&mut self, path: impl Into<String>) {
        self.states.entry(path.into()).or_default().thumbnail_loaded = true;
    }

    /// Marks a path's preview as decoded, creating the entry if needed.
    pub fn mark_preview_loaded(&mut self, path: impl Into<String>) {
        self.states.entry(path.into()).or_default().preview_loaded = true;
    }

    /// Drops the state for a path removed from the owning collection.
    pub fn remove(&mut self, path: &str) -> Option<ViewState> {
        self.states.remove(path)
    }

    /// Drops state for every path the owning collection no longer holds.
    pub fn prune(&mut self, keep: impl Fn(&str) -> bool) {
        self.states.retain(|path, _| keep(path));
    }

    /// Drops all recorded state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Returns the number of tracked paths.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true when no paths are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
