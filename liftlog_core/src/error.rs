//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A set operation addressed an index outside the current plan
    #[error("Invalid set index {index} (plan has {len} sets)")]
    InvalidIndex { index: usize, len: usize },

    /// An operation that needs an active session was called while idle
    #[error("Cannot {operation} while session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: crate::SessionPhase,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Routine could not be loaded
    #[error("Routine error: {0}")]
    Routine(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
