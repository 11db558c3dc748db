//! Core error types for lilytimer-core.
//!
//! The timer state machine itself has no error surface: out-of-precondition
//! operations are no-ops. Errors only exist at the edges (configuration
//! files, notification delivery, talking to a session that has shut down).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lilytimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Configuration directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DataDir(String),

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
}

/// Notification delivery errors.
///
/// These are reported by dispatchers and logged by the session; they never
/// feed back into timer state.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The user or platform refused notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The platform accepted the request but failed to deliver it
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Errors returned by [`crate::SessionHandle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session task has stopped and no longer accepts commands
    #[error("timer session is closed")]
    Closed,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
