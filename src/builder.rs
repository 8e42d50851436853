//! Configuration for [`LruCache`].
//!
//! ## Options
//!
//! | Option        | Type    | Default  | Description                              |
//! |---------------|---------|----------|------------------------------------------|
//! | `capacity`    | `usize` | required | Maximum entries, must be at least 1      |
//! | `preallocate` | `bool`  | `true`   | Reserve index and list storage up front  |
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::LruCacheBuilder;
//! use lrukit::policy::lru::LruCache;
//!
//! let cache: LruCache<String, u64> = LruCacheBuilder::new(1024)
//!     .preallocate(false)
//!     .try_build()
//!     .expect("non-zero capacity");
//! cache.set("hits".to_string(), 1);
//! assert_eq!(cache.capacity(), 1024);
//!
//! assert!(LruCacheBuilder::new(0).try_build::<String, u64>().is_err());
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::{LruCache, LruCore};

/// Builder for [`LruCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LruCacheBuilder {
    capacity: usize,
    preallocate: bool,
}

impl LruCacheBuilder {
    /// Starts a configuration for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            preallocate: true,
        }
    }

    /// Whether to reserve storage for the full capacity at construction.
    ///
    /// Turn this off for large, sparsely filled caches.
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.preallocate = preallocate;
        self
    }

    /// Maximum number of entries the built cache will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero. For a non-panicking alternative, use
    /// [`try_build`](Self::try_build).
    pub fn build<K, V>(self) -> LruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the cache, returning an error on invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let core = LruCore::try_with_options(self.capacity, self.preallocate)?;
        Ok(LruCache::from_core(core))
    }
}

impl Default for LruCacheBuilder {
    fn default() -> Self {
        Self::new(crate::policy::lru::DEFAULT_CAPACITY)
    }
}
