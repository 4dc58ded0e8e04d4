//! Cache sizing configuration.
//!
//! These structures define the memory bounds for an Iris session. They
//! carry no persistence of their own; the settings layer that loads and
//! saves them lives with the application shell.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_IMAGE_CAPACITY, DEFAULT_OPERATION_ENTRIES, DEFAULT_THUMBNAIL_CAPACITY,
};
use crate::error::{CacheError, CacheResult};

/// Sizing configuration for all caches in a session.
///
/// # Example
///
/// ```rust
/// use iris_common::config::CacheSettings;
///
/// let settings = CacheSettings::default();
/// assert_eq!(settings.thumbnail_capacity, 512);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of resident thumbnails.
    pub thumbnail_capacity: usize,

    /// Maximum number of resident full-size decoded images.
    pub image_capacity: usize,

    /// Combined entry limit for the operation-result cache.
    pub operation_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            thumbnail_capacity: DEFAULT_THUMBNAIL_CAPACITY,
            image_capacity: DEFAULT_IMAGE_CAPACITY,
            operation_entries: DEFAULT_OPERATION_ENTRIES,
        }
    }
}

impl CacheSettings {
    /// Creates settings with the given thumbnail capacity.
    #[must_use]
    pub fn with_thumbnail_capacity(thumbnail_capacity: usize) -> Self {
        Self {
            thumbnail_capacity,
            ..Default::default()
        }
    }

    /// Creates minimal settings for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            thumbnail_capacity: 8,
            image_capacity: 2,
            operation_entries: 4,
        }
    }

    /// Validates the settings and returns an error if any bound is zero.
    pub fn validate(&self) -> CacheResult<()> {
        if self.thumbnail_capacity == 0 {
            return Err(CacheError::invalid_configuration(
                "thumbnail_capacity must be positive",
            ));
        }
        if self.image_capacity == 0 {
            return Err(CacheError::invalid_configuration(
                "image_capacity must be positive",
            ));
        }
        if self.operation_entries == 0 {
            return Err(CacheError::invalid_configuration(
                "operation_entries must be positive",
            ));
        }
        Ok(())
    }
}
