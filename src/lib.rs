//! lrukit: a fixed-capacity, thread-safe LRU cache.
//!
//! [`LruCache`](policy::lru::LruCache) keeps a hash index and an
//! arena-backed recency list in step behind one exclusive lock. Reads
//! promote, so every operation is serialized.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let cache = LruCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get(&"a");
//! cache.set("c", 3);
//! assert!(cache.get(&"b").is_none());
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
