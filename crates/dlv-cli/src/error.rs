//! CLI error types.

use std::borrow::Cow;

use dlv_access::AccessError;
use dlv_config::ConfigError;
use dlv_service::{ServiceError, StatusClass};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A service operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A capability list could not be parsed.
    #[error("invalid argument: {0}")]
    Access(#[from] AccessError),

    /// A settings key could not be parsed.
    #[error("invalid argument: {0}")]
    Config(#[from] ConfigError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: 3 for not found, 4 for forbidden, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Service(e) => match e.status() {
                StatusClass::NotFound => 3,
                StatusClass::Forbidden => 4,
                StatusClass::ServerError => 1,
            },
            _ => 1,
        }
    }

    /// Hint printed after the error, if there is one.
    #[must_use]
    pub fn remediation(&self) -> Option<Cow<'static, str>> {
        match self {
            Self::Service(e) => Some(e.remediation()),
            _ => None,
        }
    }
}
