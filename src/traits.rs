//! # Cache Trait
//!
//! The capability every eviction policy in lrukit offers to callers. Code
//! that only needs Get/Set/Clear should take `impl Cache<K, V>` so another
//! policy can be dropped in without touching the call sites.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │              Cache<K, V>                │
//!   │                                         │
//!   │  set(&, K, V) → bool (existed before)   │
//!   │  get(&, &K) → Option<Arc<V>>            │
//!   │  clear(&)                               │
//!   │  len(&) → usize                         │
//!   │  capacity(&) → usize                    │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!            ┌──────────────────┐
//!            │  LruCache<K, V>  │
//!            └──────────────────┘
//! ```
//!
//! Methods take `&self`: implementations are shared handles that serialize
//! access internally, so a `Cache` can be called from many threads at once.
//! `get` is allowed to mutate policy state (LRU promotes on read).
//!
//! ## Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//! use lrukit::traits::Cache;
//!
//! fn warm<C: Cache<u64, String>>(cache: &C, rows: &[(u64, &str)]) {
//!     for (id, name) in rows {
//!         cache.set(*id, name.to_string());
//!     }
//! }
//!
//! let cache = LruCache::new(8);
//! warm(&cache, &[(1, "one"), (2, "two")]);
//! assert_eq!(cache.get(&2).as_deref().map(String::as_str), Some("two"));
//! ```

use std::sync::Arc;

/// Fixed-capacity key/value cache with a policy-defined eviction order.
pub trait Cache<K, V> {
    /// Stores `value` under `key`, evicting per policy when full.
    ///
    /// Returns `true` if `key` was already present (its value is replaced).
    fn set(&self, key: K, value: V) -> bool;

    /// Looks up `key`, returning a shared handle to the value on a hit.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Removes every entry. Capacity is unchanged.
    fn clear(&self);

    /// Number of entries currently stored.
    fn len(&self) -> usize;

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// `true` when the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Marker for caches that are safe to share across threads.
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::ConcurrentCache;
///
/// fn assert_concurrent<C: ConcurrentCache>(_: &C) {}
/// assert_concurrent(&LruCache::<String, Vec<u8>>::new(4));
/// ```
pub trait ConcurrentCache: Send + Sync {}
