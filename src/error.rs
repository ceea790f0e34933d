//! Error types
//!
//! Game-rule situations are never errors; they are ordinary transitions of
//! the move-input state machine. What remains here is configuration and
//! storage trouble.

use thiserror::Error;

use crate::board::fen::FenError;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("starting time must be greater than zero")]
    ZeroStartingTime,

    #[error("invalid start position: {0}")]
    Fen(#[from] FenError),
}

/// Storage-layer result type alias
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value storage failures.
///
/// These never reach the game logic: the session repository logs and drops
/// them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session payload could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
