//! Error types for the LRU cache
//!
//! The cache operations themselves are total; errors only arise at the edges
//! (text dumps, configuration parsing and console input).

use thiserror::Error;

// == LRU Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum LruError {
    /// State could not be written as JSON
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value could not be understood
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A console line could not be parsed into a command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, LruError>;
