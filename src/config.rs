//! Session configuration
//!
//! Defaults mirror a three-minute blitz game from the standard opening.
//! `from_env` overlays `CHESS_SESSION_*` variables on top of the defaults.

use std::env;
use std::path::PathBuf;

use crate::board::fen::{self, STARTING_PLACEMENT};
use crate::board::BoardPosition;
use crate::clock::{DEFAULT_STARTING_MS, DEFAULT_TICK_INTERVAL_MS};
use crate::error::ConfigError;

pub const ENV_START_MS: &str = "CHESS_SESSION_START_MS";
pub const ENV_TICK_MS: &str = "CHESS_SESSION_TICK_MS";
pub const ENV_FEN: &str = "CHESS_SESSION_FEN";
pub const ENV_DIR: &str = "CHESS_SESSION_DIR";
pub const ENV_FREEZE: &str = "CHESS_SESSION_FREEZE";
pub const ENV_SHOW_IDS: &str = "CHESS_SESSION_SHOW_IDS";

/// Session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Time each side starts with
    pub starting_time_ms: u64,
    /// Clock tick period
    pub tick_interval_ms: u64,
    /// Position a fresh session starts from
    pub start_position: BoardPosition,
    /// Directory holding the persisted session
    pub storage_dir: PathBuf,
    /// Ignore clicks once a clock has run out
    pub freeze_on_time_up: bool,
    /// Draw square identifiers on the board
    pub show_square_ids: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_time_ms: DEFAULT_STARTING_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            start_position: fen::parse_placement(STARTING_PLACEMENT).unwrap_or_default(),
            storage_dir: default_storage_dir(),
            freeze_on_time_up: true,
            show_square_ids: false,
        }
    }
}

impl SessionConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_START_MS) {
            config.starting_time_ms = parse_number(ENV_START_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_TICK_MS) {
            config.tick_interval_ms = parse_number(ENV_TICK_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_FEN) {
            config.start_position = fen::parse_placement(&v)?;
        }
        if let Some(v) = lookup(ENV_DIR) {
            config.storage_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_FREEZE) {
            config.freeze_on_time_up = parse_flag(ENV_FREEZE, &v)?;
        }
        if let Some(v) = lookup(ENV_SHOW_IDS) {
            config.show_square_ids = parse_flag(ENV_SHOW_IDS, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        // A clock that starts at zero could never flag
        if self.starting_time_ms == 0 {
            return Err(ConfigError::ZeroStartingTime);
        }
        Ok(())
    }
}

/// Platform data directory, or a dot-directory in the working directory
fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("chess-session"))
        .unwrap_or_else(|| PathBuf::from(".chess-session"))
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
