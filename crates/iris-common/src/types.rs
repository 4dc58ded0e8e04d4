//! Shared key types.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Cache key for a decoded thumbnail or image.
///
/// Keys are a file path optionally combined with a target pixel size, so
/// the same file rendered at different sizes occupies distinct cache
/// entries.
///
/// # Example
///
/// ```rust
/// use iris_common::types::ThumbnailKey;
///
/// let full = ThumbnailKey::of_path("/photos/cat.jpg");
/// let thumb = ThumbnailKey::new("/photos/cat.jpg", 256);
/// assert_ne!(full, thumb);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThumbnailKey {
    path: PathBuf,
    size: Option<u32>,
}

impl ThumbnailKey {
    /// Creates a key for a file rendered at the given pixel size.
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            path: path.into(),
            size: Some(size),
        }
    }

    /// Creates a key for a file at its native size.
    pub fn of_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: None,
        }
    }

    /// Returns the file path component.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the pixel size component, if any.
    pub fn size(&self) -> Option<u32> {
        self.size
    }
}

impl fmt::Display for ThumbnailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(f, "{}@{}", self.path.display(), size),
            None => write!(f, "{}", self.path.display()),
        }
    }
}
