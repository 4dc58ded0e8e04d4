//! # iris-common
//!
//! Common types, errors, and configuration for the Iris image browser.
//!
//! This crate provides the foundational pieces shared across the Iris
//! components:
//!
//! - **Errors**: Unified error handling with `CacheError`
//! - **Config**: Cache sizing configuration with validation
//! - **Types**: Shared key types such as `ThumbnailKey`
//! - **Constants**: System-wide default capacities
//!
//! ## Example
//!
//! ```rust
//! use iris_common::config::CacheSettings;
//! use iris_common::error::CacheResult;
//!
//! fn example() -> CacheResult<()> {
//!     let settings = CacheSettings::default();
//!     settings.validate()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::CacheSettings;
pub use constants::*;
pub use error::{CacheError, CacheResult};
pub use types::ThumbnailKey;
