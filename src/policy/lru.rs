//! # Least Recently Used (LRU) Cache
//!
//! A fixed-capacity cache that evicts the entry whose last access is oldest.
//! Lookups, inserts and evictions are O(1).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │                 Arc<Mutex<LruCore<K, V>>>                    │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                              │                                       │
//!   │                              ▼                                       │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │                       LruCore<K, V>                          │   │
//!   │   │                                                              │   │
//!   │   │   FxHashMap<K, SlotId>         (index)                       │   │
//!   │   │      "a" ─────────┐                                          │   │
//!   │   │      "b" ───────┐ │                                          │   │
//!   │   │                 ▼ ▼                                          │   │
//!   │   │   RecencyList<Entry<K, V>>     (order + values)              │   │
//!   │   │      head ──► [a] ◄──► [b] ◄── tail                          │   │
//!   │   │      (MRU)                (LRU, next to evict)               │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry stores a copy of its key so that evicting the tail can delete
//! the matching index slot without a reverse lookup.
//!
//! ## Operations
//!
//! ```text
//!   set(D) on a full cache (capacity = 3)
//!
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!     1. pop [C] from the tail, drop "C" from the index
//!     2. push [D] at the head, index "D"
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!
//!   get(B)
//!
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!     move [B] to the head
//!     head ──► [B] ◄──► [D] ◄──► [A] ◄── tail
//! ```
//!
//! ## Concurrency Model
//!
//! `get` reorders the list, so there is no pure read path. Every
//! operation on [`LruCache`], `get` and `peek` included, takes the same
//! exclusive `parking_lot::Mutex`. Two concurrent `get`s on different keys
//! would otherwise relink neighbouring nodes at the same time.
//!
//! | Type       | Thread-safe | Use                                       |
//! |------------|-------------|-------------------------------------------|
//! | `LruCore`  | No          | Owned by one thread, or behind your lock  |
//! | `LruCache` | Yes         | Shared handle, clone to share             |
//!
//! Values pushed out by `set` or `clear` are handed back from the core and
//! dropped only after the lock is released, so a value whose `Drop` calls
//! back into the same cache does not deadlock.
//!
//! ## Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let cache = LruCache::new(2);
//! assert!(!cache.set("a", 1));
//! assert!(!cache.set("b", 2));
//! assert!(cache.set("a", 3));
//! assert_eq!(cache.get(&"a").map(|v| *v), Some(3));
//!
//! // "b" is now least recently used and makes room for "c".
//! assert!(!cache.set("c", 4));
//! assert!(cache.get(&"b").is_none());
//! assert_eq!(cache.get(&"c").map(|v| *v), Some(4));
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::builder::LruCacheBuilder;
use crate::ds::{RecencyList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::traits::{Cache, ConcurrentCache};

/// Capacity used by the `Default` impls.
pub const DEFAULT_CAPACITY: usize = 16;

/// List payload: the value plus the key needed to unindex it on eviction.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: Arc<V>,
}

/// What a write pushed out of the cache.
///
/// Returned by [`LruCore::replace`] so the caller decides where the old
/// value is dropped.
#[derive(Debug)]
pub enum Displaced<K, V> {
    /// The key was new and there was room.
    Nothing,
    /// The key existed; this is its previous value.
    Replaced(Arc<V>),
    /// The key was new and the least recently used entry made room for it.
    Evicted(K, Arc<V>),
}

impl<K, V> Displaced<K, V> {
    /// `true` when the written key was already present.
    pub fn was_present(&self) -> bool {
        matches!(self, Displaced::Replaced(_))
    }
}

/// Single-threaded LRU cache.
///
/// Holds the recency list and the key index and keeps them in step. No
/// locking; wrap it in [`LruCache`] to share across threads.
pub struct LruCore<K, V> {
    list: RecencyList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(core) => core,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_options(capacity, true)
    }

    /// Creates a cache, optionally reserving storage for all `capacity`
    /// entries up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_with_options(capacity: usize, preallocate: bool) -> Result<Self, ConfigError> {
        if capacity == 0 {
            let err = ConfigError::ZeroCapacity;
            warn!("rejected LRU cache configuration: {}", err);
            return Err(err);
        }

        let reserve = if preallocate { capacity } else { 0 };
        debug!(
            "created LRU cache (capacity={}, preallocate={})",
            capacity, preallocate
        );
        Ok(Self {
            list: RecencyList::with_capacity(reserve),
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            capacity,
        })
    }

    /// Stores `value` under `key` and makes it the most recently used entry.
    ///
    /// Returns `true` if the key was already present. See
    /// [`replace`](Self::replace) to get hold of what was pushed out.
    pub fn insert(&mut self, key: K, value: Arc<V>) -> bool {
        self.replace(key, value).was_present()
    }

    /// Like [`insert`](Self::insert), but hands back the displaced value.
    ///
    /// On a hit the value is swapped in place. On a miss with a full cache
    /// the least recently used entry is evicted first and returned.
    pub fn replace(&mut self, key: K, value: Arc<V>) -> Displaced<K, V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return match self.list.get_mut(id) {
                Some(entry) => Displaced::Replaced(mem::replace(&mut entry.value, value)),
                None => Displaced::Nothing,
            };
        }

        let displaced = if self.index.len() >= self.capacity {
            self.evict_lru()
                .map_or(Displaced::Nothing, |(k, v)| Displaced::Evicted(k, v))
        } else {
            Displaced::Nothing
        };

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        displaced
    }

    /// Returns the value for `key` and promotes it to most recently used.
    pub fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns the value for `key` without touching recency order.
    pub fn peek(&self, key: &K) -> Option<&Arc<V>> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// The entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &Arc<V>)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry at once. Capacity is unchanged.
    pub fn clear(&mut self) {
        drop(self.take_entries());
    }

    /// Empties the cache and returns the old entries for the caller to drop.
    fn take_entries(&mut self) -> RecencyList<Entry<K, V>> {
        self.index.clear();
        let entries = mem::take(&mut self.list);
        debug!("cleared LRU cache ({} entries dropped)", entries.len());
        entries
    }

    /// Verifies that the index and the recency list agree.
    ///
    /// Checks the list linkage, that sizes match and stay within capacity,
    /// and that every indexed key points at an entry carrying that key. With
    /// sizes equal, this also rules out duplicate keys in the list.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys but list has {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "slot {} holds a different key than its index entry",
                        id.index()
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "index points at empty slot {}",
                        id.index()
                    )));
                },
            }
        }
        Ok(())
    }

    /// Pops the tail and unindexes it before anything else touches the list.
    fn evict_lru(&mut self) -> Option<(K, Arc<V>)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        trace!(
            "evicted LRU entry (len={}, capacity={})",
            self.index.len(),
            self.capacity
        );
        Some((entry.key, entry.value))
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with a capacity of [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, Arc::new(value));
        }
    }
}

/// Thread-safe LRU cache.
///
/// A cheap-to-clone handle to an [`LruCore`] behind a single exclusive lock.
/// Values come back as `Arc<V>` so callers never borrow into the locked
/// structure.
pub struct LruCache<K, V> {
    inner: Arc<Mutex<LruCore<K, V>>>,
    // Fixed at construction; read without the lock.
    capacity: usize,
}

impl<K, V> Clone for LruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. For a non-panicking alternative use
    /// [`try_new`](Self::try_new) or [`builder`](Self::builder) with
    /// [`try_build`](LruCacheBuilder::try_build).
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<String, u32> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a cache, rejecting a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// assert!(LruCache::<u64, u64>::try_new(0).is_err());
    /// assert!(LruCache::<u64, u64>::try_new(1).is_ok());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        LruCore::try_new(capacity).map(Self::from_core)
    }

    /// Returns a builder for configuring the cache.
    pub fn builder(capacity: usize) -> LruCacheBuilder {
        LruCacheBuilder::new(capacity)
    }

    pub(crate) fn from_core(core: LruCore<K, V>) -> Self {
        Self {
            capacity: core.capacity(),
            inner: Arc::new(Mutex::new(core)),
        }
    }

    /// Stores `value` under `key`, returning whether the key existed before.
    pub fn set(&self, key: K, value: V) -> bool {
        self.set_arc(key, Arc::new(value))
    }

    /// Stores an already shared value.
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    /// use std::sync::Arc;
    ///
    /// let cache = LruCache::new(4);
    /// let shared = Arc::new(vec![1u8, 2, 3]);
    /// cache.set_arc("blob", Arc::clone(&shared));
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&"blob").unwrap()));
    /// ```
    pub fn set_arc(&self, key: K, value: Arc<V>) -> bool {
        // The guard is a temporary, so it is gone before `displaced` drops.
        let displaced = self.inner.lock().replace(key, value);
        displaced.was_present()
    }

    /// Returns the value for `key` and promotes it to most recently used.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Returns the value for `key` without promoting it.
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache = LruCache::new(2);
    /// cache.set(1, "one");
    /// cache.set(2, "two");
    /// assert_eq!(cache.peek(&1).map(|v| *v), Some("one"));
    ///
    /// // 1 was only peeked, so it is still the eviction candidate.
    /// cache.set(3, "three");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key).map(Arc::clone)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// The entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.lock();
        core.peek_lru()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
    }

    /// Snapshot of keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        self.inner.lock().keys_mru()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the cache under one lock acquisition.
    ///
    /// The old values are dropped after the lock is released.
    pub fn clear(&self) {
        let entries = self.inner.lock().take_entries();
        drop(entries);
    }

    /// Verifies the cache invariants. See [`LruCore::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&self, key: K, value: V) -> bool {
        LruCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LruCache::get(self, key)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }
}

impl<K, V> ConcurrentCache for LruCache<K, V>
where
    K: Send,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with a capacity of [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod core_behavior {
        use super::*;

        #[test]
        fn zero_capacity_is_rejected() {
            let err = LruCore::<u32, u32>::try_new(0).unwrap_err();
            assert_eq!(err, ConfigError::ZeroCapacity);
            assert!(err.message().contains("capacity"));
            assert!(LruCore::<u32, u32>::try_with_options(0, false).is_err());
        }

        #[test]
        #[should_panic(expected = "capacity")]
        fn new_panics_on_zero_capacity() {
            let _ = LruCore::<u32, u32>::new(0);
        }

        #[test]
        fn insert_reports_prior_presence() {
            let mut cache = LruCore::new(4);
            assert!(!cache.insert("a", Arc::new(1)));
            assert!(cache.insert("a", Arc::new(2)));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&"a").map(|v| **v), Some(2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn update_promotes_entry() {
            let mut cache = LruCore::new(3);
            cache.insert(1, Arc::new("one"));
            cache.insert(2, Arc::new("two"));
            cache.insert(3, Arc::new("three"));
            assert_eq!(cache.keys_mru(), vec![3, 2, 1]);

            cache.insert(1, Arc::new("uno"));
            assert_eq!(cache.keys_mru(), vec![1, 3, 2]);
        }

        #[test]
        fn get_promotes_and_miss_leaves_order() {
            let mut cache = LruCore::new(3);
            cache.insert(1, Arc::new(10));
            cache.insert(2, Arc::new(20));
            cache.insert(3, Arc::new(30));

            assert_eq!(cache.get(&1).map(|v| **v), Some(10));
            assert_eq!(cache.keys_mru(), vec![1, 3, 2]);

            assert!(cache.get(&99).is_none());
            assert_eq!(cache.keys_mru(), vec![1, 3, 2]);
        }

        #[test]
        fn eviction_removes_tail_and_its_index_slot() {
            let mut cache = LruCore::new(2);
            cache.insert("a", Arc::new(1));
            cache.insert("b", Arc::new(2));
            assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some("a"));

            cache.insert("c", Arc::new(3));
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.keys_mru(), vec!["c", "b"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn capacity_one_replaces_on_every_new_key() {
            let mut cache = LruCore::new(1);
            for i in 0..10 {
                assert!(!cache.insert(i, Arc::new(i)));
                assert_eq!(cache.len(), 1);
                assert_eq!(cache.keys_mru(), vec![i]);
            }
            assert!(cache.insert(9, Arc::new(90)));
            assert_eq!(cache.peek(&9).map(|v| **v), Some(90));
        }

        #[test]
        fn peek_does_not_promote() {
            let mut cache = LruCore::new(2);
            cache.insert(1, Arc::new(1));
            cache.insert(2, Arc::new(2));
            assert!(cache.peek(&1).is_some());
            cache.insert(3, Arc::new(3));
            assert!(!cache.contains(&1));
        }

        #[test]
        fn remove_unlinks_entry() {
            let mut cache = LruCore::new(3);
            cache.insert(1, Arc::new(1));
            cache.insert(2, Arc::new(2));
            cache.insert(3, Arc::new(3));

            assert_eq!(cache.remove(&2).map(|v| *v), Some(2));
            assert_eq!(cache.remove(&2), None);
            assert_eq!(cache.keys_mru(), vec![3, 1]);
            cache.check_invariants().unwrap();

            // Freed room means the next insert evicts nothing.
            cache.insert(4, Arc::new(4));
            assert_eq!(cache.keys_mru(), vec![4, 3, 1]);
        }

        #[test]
        fn clear_keeps_capacity_and_allows_refill() {
            let mut cache = LruCore::new(3);
            for i in 0..3 {
                cache.insert(i, Arc::new(i));
            }
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 3);
            assert!(cache.peek_lru().is_none());
            for i in 0..3 {
                assert!(cache.get(&i).is_none());
            }

            for i in 10..13 {
                assert!(!cache.insert(i, Arc::new(i)));
            }
            assert_eq!(cache.keys_mru(), vec![12, 11, 10]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn value_arc_is_shared_not_copied() {
            let mut cache = LruCore::new(2);
            let value = Arc::new(String::from("payload"));
            cache.insert("k", Arc::clone(&value));
            assert_eq!(Arc::strong_count(&value), 2);

            cache.remove(&"k");
            assert_eq!(Arc::strong_count(&value), 1);
        }

        #[test]
        fn string_keys_work() {
            let mut cache: LruCore<String, usize> = LruCore::new(2);
            cache.insert("alpha".to_string(), Arc::new(1));
            cache.insert("beta".to_string(), Arc::new(2));
            cache.get(&"alpha".to_string());
            cache.insert("gamma".to_string(), Arc::new(3));
            assert!(cache.contains(&"alpha".to_string()));
            assert!(!cache.contains(&"beta".to_string()));
        }

        #[test]
        fn extend_inserts_in_order() {
            let mut cache = LruCore::new(3);
            cache.extend((0..5).map(|i| (i, i * 10)));
            assert_eq!(cache.keys_mru(), vec![4, 3, 2]);
        }

        #[test]
        fn replace_hands_back_what_it_displaced() {
            let mut cache = LruCore::new(1);
            assert!(matches!(cache.replace("a", Arc::new(1)), Displaced::Nothing));

            match cache.replace("a", Arc::new(2)) {
                Displaced::Replaced(old) => assert_eq!(*old, 1),
                other => panic!("expected Replaced, got {:?}", other),
            }
            match cache.replace("b", Arc::new(3)) {
                Displaced::Evicted(key, old) => assert_eq!((key, *old), ("a", 2)),
                other => panic!("expected Evicted, got {:?}", other),
            }
            assert_eq!(cache.keys_mru(), vec!["b"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn check_invariants_detects_index_drift() {
            let mut cache = LruCore::new(3);
            cache.insert(1, Arc::new(1));
            cache.insert(2, Arc::new(2));
            cache.index.remove(&1);
            assert!(cache.check_invariants().is_err());
        }

        #[test]
        fn default_and_debug() {
            let cache: LruCore<u8, u8> = LruCore::default();
            assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("LruCore"));
            assert!(dbg.contains("capacity"));
        }
    }

    mod shared_handle {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[test]
        fn scenario_from_capacity_two() {
            let cache = LruCache::new(2);
            assert!(!cache.set("a", 1));
            assert!(!cache.set("b", 2));
            assert!(cache.set("a", 3));
            assert_eq!(cache.get(&"a").map(|v| *v), Some(3));
            assert!(!cache.set("c", 4));
            assert!(cache.get(&"b").is_none());
            assert_eq!(cache.get(&"c").map(|v| *v), Some(4));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn clones_share_state() {
            let cache = LruCache::new(4);
            let other = cache.clone();
            cache.set(1, "one");
            assert_eq!(other.get(&1).map(|v| *v), Some("one"));
            other.clear();
            assert!(cache.is_empty());
        }

        #[test]
        fn peek_lru_reports_next_victim() {
            let cache = LruCache::new(3);
            cache.set("x", 1);
            cache.set("y", 2);
            cache.set("z", 3);
            cache.get(&"x");
            assert_eq!(cache.peek_lru().map(|(k, v)| (k, *v)), Some(("y", 2)));
            assert_eq!(cache.keys_mru(), vec!["x", "z", "y"]);
        }

        #[test]
        fn usable_through_trait_object() {
            let cache = LruCache::new(2);
            let dyn_cache: &dyn Cache<&str, i32> = &cache;
            assert!(!dyn_cache.set("a", 1));
            assert!(dyn_cache.set("a", 2));
            assert_eq!(dyn_cache.get(&"a").map(|v| *v), Some(2));
            assert_eq!(dyn_cache.len(), 1);
            assert_eq!(dyn_cache.capacity(), 2);
            dyn_cache.clear();
            assert!(dyn_cache.is_empty());
        }

        #[test]
        fn is_send_and_sync() {
            fn assert_send_sync<T: Send + Sync>() {}
            assert_send_sync::<LruCache<String, Vec<u8>>>();
            assert_send_sync::<LruCache<u64, String>>();
        }

        /// Value whose destructor calls back into the cache holding it.
        struct Reentrant {
            cache: LruCache<u8, Reentrant>,
            drops: Arc<AtomicUsize>,
        }

        impl Drop for Reentrant {
            fn drop(&mut self) {
                let _ = self.cache.len();
                self.drops.fetch_add(1, Ordering::SeqCst);
            }
        }

        #[test]
        fn displaced_values_drop_outside_the_lock() {
            let cache: LruCache<u8, Reentrant> = LruCache::new(1);
            let drops = Arc::new(AtomicUsize::new(0));
            let make = || Reentrant {
                cache: cache.clone(),
                drops: Arc::clone(&drops),
            };

            assert!(!cache.set(1, make()));
            assert!(cache.set(1, make()));
            assert_eq!(drops.load(Ordering::SeqCst), 1);

            assert!(!cache.set(2, make()));
            assert_eq!(drops.load(Ordering::SeqCst), 2);

            cache.clear();
            assert_eq!(drops.load(Ordering::SeqCst), 3);
            assert!(cache.is_empty());
        }

        #[test]
        fn capacity_does_not_wait_for_the_lock() {
            let cache: LruCache<u8, u8> = LruCache::new(7);
            let clone = cache.clone();
            let _guard = cache.inner.lock();
            assert_eq!(cache.capacity(), 7);
            assert_eq!(clone.capacity(), 7);
        }

        #[test]
        fn try_new_rejects_zero() {
            assert!(LruCache::<u32, u32>::try_new(0).is_err());
            let cache = LruCache::<u32, u32>::try_new(5).unwrap();
            assert_eq!(cache.capacity(), 5);
            assert!(format!("{:?}", cache).contains("LruCache"));
        }
    }

    mod model_checks {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Set(u8, u16),
            Get(u8),
            Remove(u8),
            Clear,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                6 => (0u8..16, any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
                4 => (0u8..16).prop_map(Op::Get),
                1 => (0u8..16).prop_map(Op::Remove),
                1 => Just(Op::Clear),
            ]
        }

        /// Reference model: `(key, value)` pairs, most recently used first.
        struct Model {
            entries: Vec<(u8, u16)>,
            capacity: usize,
        }

        impl Model {
            fn position(&self, key: u8) -> Option<usize> {
                self.entries.iter().position(|(k, _)| *k == key)
            }

            fn set(&mut self, key: u8, value: u16) -> bool {
                if let Some(pos) = self.position(key) {
                    self.entries.remove(pos);
                    self.entries.insert(0, (key, value));
                    return true;
                }
                if self.entries.len() == self.capacity {
                    self.entries.pop();
                }
                self.entries.insert(0, (key, value));
                false
            }

            fn get(&mut self, key: u8) -> Option<u16> {
                let pos = self.position(key)?;
                let entry = self.entries.remove(pos);
                self.entries.insert(0, entry);
                Some(entry.1)
            }

            fn remove(&mut self, key: u8) -> Option<u16> {
                let pos = self.position(key)?;
                Some(self.entries.remove(pos).1)
            }
        }

        proptest! {
            #[test]
            fn matches_reference_model(
                capacity in 1usize..8,
                ops in proptest::collection::vec(op_strategy(), 0..200),
            ) {
                let mut cache = LruCore::new(capacity);
                let mut model = Model { entries: Vec::new(), capacity };

                for op in ops {
                    match op {
                        Op::Set(k, v) => {
                            prop_assert_eq!(cache.insert(k, Arc::new(v)), model.set(k, v));
                        },
                        Op::Get(k) => {
                            prop_assert_eq!(cache.get(&k).map(|v| **v), model.get(k));
                        },
                        Op::Remove(k) => {
                            prop_assert_eq!(cache.remove(&k).map(|v| *v), model.remove(k));
                        },
                        Op::Clear => {
                            cache.clear();
                            model.entries.clear();
                        },
                    }

                    prop_assert!(cache.len() <= capacity);
                    prop_assert!(cache.check_invariants().is_ok());
                    let expected: Vec<u8> = model.entries.iter().map(|(k, _)| *k).collect();
                    prop_assert_eq!(cache.keys_mru(), expected);
                }
            }
        }
    }
}
