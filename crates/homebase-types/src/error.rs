//! Error types for homebase.

use std::io;

/// Errors produced by the homebase crates.
#[derive(Debug, thiserror::Error)]
pub enum HomebaseError {
    #[error("command error: {0}")]
    Command(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid option value: {0}")]
    InvalidOption(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HomebaseError>;
