//! Error types for access evaluation and grant management.

use thiserror::Error;

/// Errors that can occur while reading or changing access state.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A capability name did not match any known capability.
    #[error("unknown capability: {name}")]
    UnknownCapability {
        /// The name that failed to parse.
        name: String,
    },

    /// A grant state other than enable / disable was requested.
    #[error("invalid grant state: {value}")]
    InvalidGrantState {
        /// The rejected value.
        value: String,
    },

    /// Loading or saving the grant expiry failed.
    #[error("settings error: {0}")]
    Settings(#[from] dlv_config::ConfigError),
}

/// Result type alias for access operations.
pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AccessError::UnknownCapability {
            name: "root".into(),
        };
        assert_eq!(err.to_string(), "unknown capability: root");

        let err = AccessError::InvalidGrantState {
            value: "toggle".into(),
        };
        assert_eq!(err.to_string(), "invalid grant state: toggle");
    }

    #[test]
    fn settings_error_converts() {
        let err: AccessError = dlv_config::ConfigError::UnknownKey("x".into()).into();
        assert!(matches!(err, AccessError::Settings(_)));
    }
}
