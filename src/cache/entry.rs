//! Cache Entry Module
//!
//! Defines a single cached record and its links in the recency chain.

use serde::{Deserialize, Serialize};

// == Entry ==
/// One cached record.
///
/// The recency chain is threaded through the entries by key rather than by
/// pointer: following `previous` walks toward the least recently used entry,
/// following `next` walks toward the most recently used one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<K, V> {
    /// The stored copy of the value
    pub value: V,
    /// Key used just before this one, None if this is the least recent entry
    pub previous: Option<K>,
    /// Key used just after this one, None if this is the most recent entry
    pub next: Option<K>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry holding `value`.
    pub fn new(value: V) -> Self {
        Self {
            value,
            previous: None,
            next: None,
        }
    }

    // == Is Linked ==
    /// Returns true if the entry has a neighbour on either side.
    pub fn is_linked(&self) -> bool {
        self.previous.is_some() || self.next.is_some()
    }

    // == Into Value ==
    /// Consumes the entry and returns the stored value.
    pub fn into_value(self) -> V {
        self.value
    }
}
