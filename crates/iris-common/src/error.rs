//! Error types for the Iris caching layer.
//!
//! The cache layer has exactly one failure surface: invalid configuration
//! at construction time. A lookup miss is signalled through `Option`, never
//! through an error, and failures inside caller-supplied computations are
//! the caller's concern.

use thiserror::Error;

/// Errors raised by the Iris caching layer.
///
/// # Example
///
/// ```rust
/// use iris_common::error::{CacheError, CacheResult};
///
/// fn check_capacity(capacity: usize) -> CacheResult<usize> {
///     if capacity == 0 {
///         return Err(CacheError::invalid_configuration("capacity must be positive"));
///     }
///     Ok(capacity)
/// }
/// ```
#[derive(Debug, Error)]
pub enum CacheError {
    /// A capacity or entry limit was configured as zero.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was misconfigured.
        message: String,
    },

    /// Internal error - this indicates a bug.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl CacheError {
    /// Creates an `InvalidConfiguration` error with the given message.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates an `Internal` error with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type used throughout the Iris caching layer.
pub type CacheResult<T> = Result<T, CacheError>;
