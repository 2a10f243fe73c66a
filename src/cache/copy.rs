//! Copy Strategy Module
//!
//! Every value crossing the cache boundary is copied so callers never alias
//! cached state. How the copy is made is chosen at construction.

use std::fmt;
use std::str::FromStr;

use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LruError;

// == Copy Mode ==
/// Recognized copy strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyMode {
    /// Structural copy; no shared mutable state survives, costs an allocation per op
    #[default]
    Deep,
    /// `Clone::clone`; faster, but `Rc`/`Arc` handles inside values stay shared
    Shallow,
    /// A caller supplied copy function
    Custom,
}

impl fmt::Display for CopyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyMode::Deep => f.write_str("deep"),
            CopyMode::Shallow => f.write_str("shallow"),
            CopyMode::Custom => f.write_str("custom"),
        }
    }
}

impl FromStr for CopyMode {
    type Err = LruError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deep" => Ok(CopyMode::Deep),
            "shallow" => Ok(CopyMode::Shallow),
            "custom" => Err(LruError::InvalidConfig(
                "custom copy functions must be supplied in code".to_string(),
            )),
            other => Err(LruError::InvalidConfig(format!(
                "unknown copy mode '{}', expected 'deep' or 'shallow'",
                other
            ))),
        }
    }
}

// == Copier ==
/// A copy function together with the mode it implements.
pub struct Copier<V> {
    mode: CopyMode,
    copy_fn: fn(&V) -> V,
}

impl<V> Copier<V> {
    // == Custom ==
    /// Wraps a caller supplied copy function.
    pub fn custom(copy_fn: fn(&V) -> V) -> Self {
        Self {
            mode: CopyMode::Custom,
            copy_fn,
        }
    }

    // == Mode ==
    pub fn mode(&self) -> CopyMode {
        self.mode
    }

    // == Copy ==
    /// Produces a copy of `value` according to the strategy.
    pub fn copy(&self, value: &V) -> V {
        (self.copy_fn)(value)
    }
}

impl<V: Clone> Copier<V> {
    // == Shallow ==
    /// Copies with `Clone::clone`.
    pub fn shallow() -> Self {
        Self {
            mode: CopyMode::Shallow,
            copy_fn: V::clone,
        }
    }
}

impl<V> Copier<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    // == Deep ==
    /// Copies by rebuilding the value from its serialized form.
    pub fn deep() -> Self {
        Self {
            mode: CopyMode::Deep,
            copy_fn: deep_copy::<V>,
        }
    }

    // == From Mode ==
    /// Builds the copier for a configured mode.
    ///
    /// `CopyMode::Custom` has no function attached, so it falls back to deep.
    pub fn from_mode(mode: CopyMode) -> Self {
        match mode {
            CopyMode::Shallow => Self::shallow(),
            CopyMode::Deep | CopyMode::Custom => Self::deep(),
        }
    }
}

// Manual impls: fn pointers are Copy for every V, derives would demand V: Clone/Debug.
impl<V> Clone for Copier<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Copier<V> {}

impl<V> fmt::Debug for Copier<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Copier").field("mode", &self.mode).finish()
    }
}

// == Deep Copy ==
/// Structural copy through a bincode round trip.
///
/// bincode keeps Rust's type structure, so nested options and enum variants
/// come back as they went in. Values it cannot represent (self-describing
/// types such as untagged enums or `serde_json::Value`, serializers that reject
/// their input) are passed through by `Clone` instead.
pub fn deep_copy<V>(value: &V) -> V
where
    V: Clone + Serialize + DeserializeOwned,
{
    let copied = encode_to_vec(value, standard())
        .map_err(|err| err.to_string())
        .and_then(|bytes| {
            decode_from_slice::<V, _>(&bytes, standard())
                .map(|(copy, _)| copy)
                .map_err(|err| err.to_string())
        });

    match copied {
        Ok(copy) => copy,
        Err(err) => {
            debug!(error = %err, "Value is not structurally copyable, sharing by clone");
            value.clone()
        }
    }
}
