//! Console Module
//!
//! Line-oriented commands for inspecting a `LruCache<String, serde_json::Value>`
//! from a terminal.
//!
//! # Commands
//! - `set <key> <json>` - Store a JSON value
//! - `get <key>` - Retrieve a value (refreshes recency)
//! - `has <key>` - Membership test
//! - `del <key>` / `delete <key>` / `remove <key>` - Remove a key
//! - `evict` - Drop the least recently used entry
//! - `dump` - Print the full state as JSON
//! - `keys` - List keys from most to least recent
//! - `len` - Number of entries
//! - `stats` - Hit, miss and eviction counters
//! - `help`, `quit` / `exit`

use serde_json::{json, Value};

use crate::cache::LruCache;
use crate::error::{LruError, Result};

/// Cache type driven by the console
pub type ConsoleCache = LruCache<String, Value>;

/// Usage text printed by `help`
pub const HELP: &str = "commands: set <key> <json> | get <key> | has <key> | del <key> | evict | dump | keys | len | stats | help | quit";

// == Command ==
/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { key: String, value: Value },
    Get { key: String },
    Has { key: String },
    Remove { key: String },
    Evict,
    Dump,
    Keys,
    Len,
    Stats,
    Help,
    Quit,
}

impl Command {
    // == Parse ==
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, raw) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    LruError::InvalidCommand("usage: set <key> <json>".to_string())
                })?;
                let value = serde_json::from_str(raw.trim()).map_err(|err| {
                    LruError::InvalidCommand(format!("value is not valid JSON: {}", err))
                })?;
                Command::Set {
                    key: key.to_string(),
                    value,
                }
            }
            "get" => Command::Get {
                key: single_key(verb, rest)?,
            },
            "has" => Command::Has {
                key: single_key(verb, rest)?,
            },
            "del" | "delete" | "remove" => Command::Remove {
                key: single_key(verb, rest)?,
            },
            "evict" => no_args(verb, rest, Command::Evict)?,
            "dump" => no_args(verb, rest, Command::Dump)?,
            "keys" => no_args(verb, rest, Command::Keys)?,
            "len" => no_args(verb, rest, Command::Len)?,
            "stats" => no_args(verb, rest, Command::Stats)?,
            "help" => no_args(verb, rest, Command::Help)?,
            "quit" | "exit" => no_args(verb, rest, Command::Quit)?,
            other => {
                return Err(LruError::InvalidCommand(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        Ok(Some(command))
    }

    // == Execute ==
    /// Applies the command to `cache` and returns a one-line reply.
    pub fn execute(self, cache: &mut ConsoleCache) -> Result<String> {
        let reply = match self {
            Command::Set { key, value } => {
                cache.set(key, value);
                "OK".to_string()
            }
            Command::Get { key } => match cache.get(&key) {
                Some(value) => serde_json::to_string(&value)?,
                None => "(nil)".to_string(),
            },
            Command::Has { key } => cache.has(&key).to_string(),
            Command::Remove { key } => match cache.remove(&key) {
                Some(_) => "1".to_string(),
                None => "0".to_string(),
            },
            Command::Evict => {
                let evicted = cache.least_recent().cloned();
                cache.evict();
                evicted.unwrap_or_else(|| "(empty)".to_string())
            }
            Command::Dump => cache.to_json()?,
            Command::Keys => serde_json::to_string(&cache.keys().collect::<Vec<_>>())?,
            Command::Len => cache.len().to_string(),
            Command::Stats => {
                let stats = cache.stats();
                json!({
                    "hits": stats.hits,
                    "misses": stats.misses,
                    "evictions": stats.evictions,
                    "total_entries": stats.total_entries,
                    "hit_rate": stats.hit_rate(),
                })
                .to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => "bye".to_string(),
        };
        Ok(reply)
    }
}

fn single_key(verb: &str, rest: &str) -> Result<String> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(LruError::InvalidCommand(format!("usage: {} <key>", verb)));
    }
    Ok(rest.to_string())
}

fn no_args(verb: &str, rest: &str, command: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(LruError::InvalidCommand(format!(
            "'{}' takes no arguments",
            verb
        )))
    }
}
