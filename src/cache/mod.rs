//! Cache Module
//!
//! Fixed-capacity LRU cache with copy-on-read/write value isolation.

mod copy;
mod entry;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use copy::{deep_copy, CopyMode, Copier};
pub use entry::Entry;
pub use snapshot::{Dump, Snapshot};
pub use stats::CacheStats;
pub use store::{Keys, LruCache};

// == Public Constants ==
/// Capacity used when none is given
pub const DEFAULT_CAPACITY: usize = 1000;
