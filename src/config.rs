//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{CopyMode, DEFAULT_CAPACITY};

/// Environment variable holding the maximum number of entries
pub const CAPACITY_VAR: &str = "LRU_CAPACITY";
/// Environment variable holding the copy mode (`deep` or `shallow`)
pub const COPY_MODE_VAR: &str = "LRU_COPY_MODE";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LruConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// How values are copied in and out of the cache
    pub copy_mode: CopyMode,
}

impl LruConfig {
    /// Creates a new LruConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `LRU_COPY_MODE` - `deep` or `shallow` (default: deep)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Unset variables take their default silently, unparsable ones with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            capacity: parse_or(&lookup, CAPACITY_VAR, defaults.capacity),
            copy_mode: parse_or(&lookup, COPY_MODE_VAR, defaults.copy_mode),
        }
    }
}

impl Default for LruConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            copy_mode: CopyMode::Deep,
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, fallback = %default, "Ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = LruConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.copy_mode, CopyMode::Deep);
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = LruConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, LruConfig::default());
    }

    #[test]
    fn test_config_from_lookup_values() {
        let config = LruConfig::from_lookup(lookup_from(&[
            ("LRU_CAPACITY", " 64 "),
            ("LRU_COPY_MODE", "shallow"),
        ]));
        assert_eq!(config.capacity, 64);
        assert_eq!(config.copy_mode, CopyMode::Shallow);
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = LruConfig::from_lookup(lookup_from(&[
            ("LRU_CAPACITY", "-5"),
            ("LRU_COPY_MODE", "custom"),
        ]));
        assert_eq!(config, LruConfig::default());
    }
}
