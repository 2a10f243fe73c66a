//! Snapshot Module
//!
//! Point-in-time views of the whole cache state for inspection and debugging.
//! Snapshots are never fed back into a cache.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::cache::Entry;

// == Snapshot ==
/// An owned copy of the cache state sharing nothing with the live cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<K, V>
where
    K: Eq + Hash,
{
    pub table: HashMap<K, Entry<K, V>>,
    pub capacity: usize,
    pub most_recent: Option<K>,
    pub least_recent: Option<K>,
    pub size: usize,
}

impl<K, V> Snapshot<K, V>
where
    K: Eq + Hash,
{
    // == Keys By Recency ==
    /// Walks the captured chain from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.size);
        let mut cursor = self.most_recent.as_ref();
        while let Some(key) = cursor {
            if keys.len() == self.table.len() {
                break;
            }
            keys.push(key);
            cursor = self.table.get(key).and_then(|entry| entry.previous.as_ref());
        }
        keys
    }
}

// == State View ==
/// Borrowed view of live state, serialized with the same shape as `Snapshot`.
#[derive(Serialize)]
pub(crate) struct StateView<'a, K, V> {
    pub table: &'a HashMap<K, Entry<K, V>>,
    pub capacity: usize,
    pub most_recent: Option<&'a K>,
    pub least_recent: Option<&'a K>,
    pub size: usize,
}

// == Dump ==
/// Result of `LruCache::dump`: JSON text or a structural copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Dump<K, V>
where
    K: Eq + Hash,
{
    Text(String),
    State(Snapshot<K, V>),
}

impl<K, V> Dump<K, V>
where
    K: Eq + Hash,
{
    /// Returns the JSON text if this is a text dump.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Dump::Text(text) => Some(text),
            Dump::State(_) => None,
        }
    }

    /// Returns the snapshot if this is a structural dump.
    pub fn into_state(self) -> Option<Snapshot<K, V>> {
        match self {
            Dump::Text(_) => None,
            Dump::State(snapshot) => Some(snapshot),
        }
    }
}
