//! Cache Store Module
//!
//! The LRU engine: a lookup table whose entries carry the recency chain as
//! key back-references, giving O(1) get, set, remove and evict.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::snapshot::StateView;
use crate::cache::{CacheStats, Copier, Dump, Entry, Snapshot, DEFAULT_CAPACITY};
use crate::config::LruConfig;
use crate::error::Result;

// == LRU Cache ==
/// Fixed-capacity least recently used cache.
///
/// Values are copied on the way in and on the way out, so nothing a caller
/// holds ever aliases cached state (subject to the configured [`Copier`]).
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key-value storage, each entry linked to its neighbours by key
    table: HashMap<K, Entry<K, V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Key of the entry accessed or inserted last
    most_recent: Option<K>,
    /// Key of the next eviction candidate
    least_recent: Option<K>,
    /// Number of entries, always equal to `table.len()`
    size: usize,
    /// How values are copied across the cache boundary
    copier: Copier<V>,
    /// Usage counters
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty cache with an explicit copy strategy.
    ///
    /// A capacity of 0 is accepted: every insert is evicted straight away.
    pub fn with_copier(capacity: usize, copier: Copier<V>) -> Self {
        Self {
            table: HashMap::new(),
            capacity,
            most_recent: None,
            least_recent: None,
            size: 0,
            copier,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// A hit counts as a use: the entry is re-inserted with a fresh copy and
    /// becomes the most recent one. A miss has no side effect besides stats.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (owned_key, output, refreshed) = match self.table.get_key_value(key) {
            Some((stored_key, entry)) => (
                stored_key.clone(),
                self.copier.copy(&entry.value),
                self.copier.copy(&entry.value),
            ),
            None => {
                trace!("Cache miss");
                self.stats.record_miss();
                return None;
            }
        };

        trace!("Cache hit");
        self.stats.record_hit();
        self.link_most_recent(owned_key, refreshed);
        Some(output)
    }

    // == Peek ==
    /// Returns a copy of the value without refreshing recency or touching stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table
            .get(key)
            .map(|entry| self.copier.copy(&entry.value))
    }

    // == Set ==
    /// Stores a copy of `value` under `key` as the most recent entry.
    ///
    /// Updating an existing key keeps the size unchanged. Inserting past
    /// capacity evicts the least recently used entry.
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        let value = self.copier.copy(&value);
        self.link_most_recent(key, value);
        self
    }

    /// Links an already copied value at the most recent end.
    fn link_most_recent(&mut self, key: K, value: V) {
        let mut entry = match self.remove(&key) {
            Some(mut existing) => {
                existing.value = value;
                existing
            }
            None => Entry::new(value),
        };

        entry.next = None;
        entry.previous = self.most_recent.take();

        if let Some(newest) = entry.previous.as_ref() {
            if let Some(newest_entry) = self.table.get_mut(newest) {
                newest_entry.next = Some(key.clone());
            }
        }

        self.table.insert(key.clone(), entry);

        if self.least_recent.is_none() {
            self.least_recent = Some(key.clone());
        }
        self.most_recent = Some(key);
        self.size += 1;

        if self.size > self.capacity {
            self.evict();
        }
    }

    // == Remove ==
    /// Detaches `key` from the table and the chain, returning its entry.
    ///
    /// The returned entry keeps the links it had at the time of removal.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.table.remove(key)?;
        self.size -= 1;

        if let Some(previous) = entry.previous.as_ref() {
            if let Some(older) = self.table.get_mut::<K>(previous) {
                older.next = entry.next.clone();
            }
        }

        if let Some(next) = entry.next.as_ref() {
            if let Some(newer) = self.table.get_mut::<K>(next) {
                newer.previous = entry.previous.clone();
            }
        }

        if is_key(self.most_recent.as_ref(), key) {
            self.most_recent = entry.previous.clone();
        }

        if is_key(self.least_recent.as_ref(), key) {
            self.least_recent = entry.next.clone();
        }

        Some(entry)
    }

    // == Delete ==
    /// Alias of [`LruCache::remove`].
    pub fn delete<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key)
    }

    // == Evict ==
    /// Removes the least recently used entry. No-op on an empty cache.
    pub fn evict(&mut self) -> &mut Self {
        if let Some(oldest) = self.least_recent.clone() {
            self.remove(&oldest);
            self.stats.record_eviction();
            debug!(
                size = self.size,
                capacity = self.capacity,
                "Evicted least recently used entry"
            );
        }
        self
    }

    // == Has ==
    /// Membership test. Does not count as a use.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(key)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn copier(&self) -> Copier<V> {
        self.copier
    }

    /// Key of the most recently used entry.
    pub fn most_recent(&self) -> Option<&K> {
        self.most_recent.as_ref()
    }

    /// Key of the entry that would be evicted next.
    pub fn least_recent(&self) -> Option<&K> {
        self.least_recent.as_ref()
    }

    // == Keys ==
    /// Iterates keys from most to least recently used without affecting recency.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            table: &self.table,
            cursor: self.most_recent.as_ref(),
            remaining: self.size,
        }
    }

    // == Stats ==
    /// Returns current usage statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.size);
        stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
    }

    // == Snapshot ==
    /// Structural copy of the whole state. Values go through the copier.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        let table = self
            .table
            .iter()
            .map(|(key, entry)| {
                let copy = Entry {
                    value: self.copier.copy(&entry.value),
                    previous: entry.previous.clone(),
                    next: entry.next.clone(),
                };
                (key.clone(), copy)
            })
            .collect();

        Snapshot {
            table,
            capacity: self.capacity,
            most_recent: self.most_recent.clone(),
            least_recent: self.least_recent.clone(),
            size: self.size,
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Creates an empty cache that deep-copies values.
    pub fn new(capacity: usize) -> Self {
        Self::with_copier(capacity, Copier::deep())
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &LruConfig) -> Self {
        Self::with_copier(config.capacity, Copier::from_mode(config.copy_mode))
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    // == Dump ==
    /// Captures the whole state, as compact JSON when `as_text` is set,
    /// otherwise as a structural copy.
    pub fn dump(&self, as_text: bool) -> Result<Dump<K, V>> {
        if as_text {
            Ok(Dump::Text(self.to_json()?))
        } else {
            Ok(Dump::State(self.snapshot()))
        }
    }

    /// Serializes the whole state as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        let view = StateView {
            table: &self.table,
            capacity: self.capacity,
            most_recent: self.most_recent.as_ref(),
            least_recent: self.least_recent.as_ref(),
            size: self.size,
        };
        Ok(serde_json::to_string(&view)?)
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn is_key<K, Q>(slot: Option<&K>, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    slot.is_some_and(|current| Borrow::<Q>::borrow(current) == key)
}

// == Keys Iterator ==
/// Keys from most to least recently used. See [`LruCache::keys`].
pub struct Keys<'a, K, V> {
    table: &'a HashMap<K, Entry<K, V>>,
    cursor: Option<&'a K>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Keys<'a, K, V>
where
    K: Eq + Hash,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.cursor?;
        self.cursor = self
            .table
            .get(key)
            .and_then(|entry| entry.previous.as_ref());
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Eq + Hash, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K: Eq + Hash, V> FusedIterator for Keys<'_, K, V> {}
