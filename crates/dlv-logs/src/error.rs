//! Error types for the log engine.

use std::path::PathBuf;

use thiserror::Error;

/// The kind of access a permission check was performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccess {
    /// Opening the file for reading.
    Read,
    /// Opening the file for writing.
    Write,
}

impl std::fmt::Display for FileAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "readable"),
            Self::Write => write!(f, "writable"),
        }
    }
}

/// Errors that can occur while reading or mutating the log file.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file does not exist.
    #[error("log file not found: {}", path.display())]
    NotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// The log file exists but cannot be opened with the required access.
    #[error("log file is not {access}: {}", path.display())]
    PermissionDenied {
        /// Path that was probed.
        path: PathBuf,
        /// The access that was refused.
        access: FileAccess,
    },

    /// The exclusive lock needed to clear the file could not be acquired.
    #[error("could not lock log file {}: {source}", path.display())]
    LockError {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying lock failure.
        #[source]
        source: std::io::Error,
    },

    /// Truncation failed after the lock was acquired.
    #[error("could not truncate log file {}: {source}", path.display())]
    TruncateError {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is larger than the download ceiling.
    #[error("log file is {size} bytes, download limit is {limit} bytes")]
    TooLarge {
        /// Current file size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// A read failed part way through (including the file vanishing mid-read).
    #[error("failed to read log file {}: {source}", path.display())]
    ReadFailed {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl LogError {
    /// Stable identifier for the error, suitable for transport payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "log_missing",
            Self::PermissionDenied {
                access: FileAccess::Read,
                ..
            } => "log_not_readable",
            Self::PermissionDenied {
                access: FileAccess::Write,
                ..
            } => "log_not_writable",
            Self::LockError { .. } => "log_lock_failed",
            Self::TruncateError { .. } => "log_truncate_failed",
            Self::TooLarge { .. } => "log_download_too_large",
            Self::ReadFailed { .. } => "log_read_failed",
        }
    }

    /// Human-readable hint telling the operator what to do about the error.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => {
                "The log file does not exist. Check that the application has logging enabled."
            }
            Self::PermissionDenied {
                access: FileAccess::Read,
                ..
            } => "The log file cannot be read. Check the file permissions.",
            Self::PermissionDenied {
                access: FileAccess::Write,
                ..
            } => "The log file cannot be written. Check the file permissions.",
            Self::LockError { .. } => {
                "The log file is locked by another process. Try again in a moment."
            }
            Self::TruncateError { .. } => "The log file could not be cleared.",
            Self::TooLarge { .. } => {
                "The log file exceeds the download limit. Clear it or fetch it from the host directly."
            }
            Self::ReadFailed { .. } => "The log file could not be opened or read.",
        }
    }

    /// Maps an I/O error raised while opening `path` into the taxonomy.
    pub(crate) fn from_open(path: &std::path::Path, access: FileAccess, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                access,
            },
            _ => Self::ReadFailed {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Result type alias for log engine operations.
pub type Result<T> = std::result::Result<T, LogError>;
