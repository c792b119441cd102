// src/errors.rs

//! Crate-wide error types.
//!
//! `CaitError` covers setup-time failures (config, watcher subscription, IO)
//! that are surfaced to the host. `BridgeError` is the descriptive value a
//! bridged operation resolves to when it does not produce a result.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Reload supervisor is already running")]
    AlreadyRunning,

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a bridged operation finished without a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("{0}")]
    Work(String),

    #[error("background work panicked: {0}")]
    Panicked(String),

    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CaitError>;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
