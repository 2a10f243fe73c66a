//! Shared Cache Module
//!
//! Thread-safe handle around an `LruCache`. The chain relinking done by
//! `set` and `remove` is not safe under interleaving, so every operation
//! holds one lock over the whole table and chain.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::cache::{CacheStats, Dump, Entry, LruCache};
use crate::error::Result;

/// Cloneable, thread-safe handle to a single `LruCache`.
///
/// Only copies ever leave the lock; no reference into cached state escapes.
#[derive(Debug)]
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> From<LruCache<K, V>> for SharedLruCache<K, V> {
    fn from(cache: LruCache<K, V>) -> Self {
        Self::new(cache)
    }
}

impl<K, V> SharedLruCache<K, V> {
    /// Wraps a cache for shared use.
    pub fn new(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Runs `f` with exclusive access to the cache.
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key)
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().peek(key)
    }

    pub fn set(&self, key: K, value: V) {
        self.inner.lock().set(key, value);
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().has(key)
    }

    pub fn evict(&self) {
        self.inner.lock().evict();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    pub fn dump(&self, as_text: bool) -> Result<Dump<K, V>> {
        self.inner.lock().dump(as_text)
    }
}
