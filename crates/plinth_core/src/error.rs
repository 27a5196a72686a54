//! Error types for plinth_core

use thiserror::Error;

/// Errors raised at the fallible edges of the engine
///
/// Composition itself never fails: an unknown renderer, malformed animation
/// settings or a missing rotation all degrade to an empty or default state.
/// These variants cover loading data from outside the process.
#[derive(Error, Debug)]
pub enum PlinthError {
    /// Editor settings file could not be parsed
    #[error("Settings parsing failed: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Block record could not be parsed
    #[error("Block parsing failed: {0}")]
    BlockParse(#[from] serde_json::Error),

    /// Failed to read a file from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown positioning mode token
    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    /// Unknown display mode token
    #[error("Unknown display: {0}")]
    UnknownDisplay(String),
}

/// Result type for plinth_core operations
pub type Result<T> = std::result::Result<T, PlinthError>;
