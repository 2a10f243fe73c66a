//! Tiny LRU - A fixed-capacity in-process least recently used cache
//!
//! Provides O(1) get/set/remove/evict with values copied across the cache
//! boundary so callers never alias cached state.

pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod shared;

pub use cache::{CacheStats, CopyMode, Copier, Dump, Entry, LruCache, Snapshot, DEFAULT_CAPACITY};
pub use config::LruConfig;
pub use error::{LruError, Result};
pub use shared::SharedLruCache;
