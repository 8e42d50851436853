//! Failures surfaced by lrukit.
//!
//! Only construction can fail: a missing key is an ordinary `None`, not an
//! error. [`InvariantError`] exists for `check_invariants`, which tests and
//! fuzz targets use to catch a list and index that disagree.
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru::LruCache;
//!
//! let err = LruCache::<String, i32>::try_new(0).unwrap_err();
//! assert_eq!(err, ConfigError::ZeroCapacity);
//! ```

use std::fmt;

/// Rejected cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A cache must be able to hold at least one entry.
    ZeroCapacity,
}

impl ConfigError {
    pub fn message(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "cache capacity must be greater than zero",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ConfigError {}

/// Describes the first broken link or count a `check_invariants` walk hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError {
    detail: String,
}

impl InvariantError {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache invariant violated: {}", self.detail)
    }
}

impl std::error::Error for InvariantError {}
