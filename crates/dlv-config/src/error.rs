//! Error types for settings persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("settings I/O error at {}: {source}", path.display())]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A settings key given by name does not exist.
    #[error("unknown setting: {0}")]
    UnknownKey(String),

    /// A value could not be parsed for its key.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// The key being set.
        key: String,
        /// The rejected raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
