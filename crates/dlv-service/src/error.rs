//! Service errors and their transport status classification.

use std::borrow::Cow;

use dlv_access::{AccessError, Action, Capability, DenialReason};
use dlv_config::ConfigError;
use dlv_logs::LogError;
use thiserror::Error;

/// Coarse status a transport should report for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The log file does not exist.
    NotFound,
    /// The caller, the environment or the file permissions forbid the action.
    Forbidden,
    /// Anything else.
    ServerError,
}

impl StatusClass {
    /// HTTP-style status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::ServerError => 500,
        }
    }
}

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Log file operation failed.
    #[error(transparent)]
    Log(#[from] LogError),

    /// Settings could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Grant bookkeeping failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The access policy denied the action.
    #[error("{}", reason.message(*action))]
    Forbidden {
        /// The denied action.
        action: Action,
        /// The most specific gate that denied it.
        reason: DenialReason,
    },

    /// The caller lacks a required capability.
    #[error("missing capability: {capability}")]
    MissingCapability {
        /// The capability that was required.
        capability: Capability,
    },
}

impl ServiceError {
    /// Status class for the transport boundary.
    #[must_use]
    pub const fn status(&self) -> StatusClass {
        match self {
            Self::Log(LogError::NotFound { .. }) => StatusClass::NotFound,
            Self::Log(LogError::PermissionDenied { .. })
            | Self::Forbidden { .. }
            | Self::MissingCapability { .. } => StatusClass::Forbidden,
            _ => StatusClass::ServerError,
        }
    }

    /// Stable machine identifier.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Log(e) => e.code(),
            Self::Config(_) => "settings_error",
            Self::Access(_) => "access_error",
            Self::Forbidden { .. } => "forbidden",
            Self::MissingCapability { .. } => "missing_capability",
        }
    }

    /// User-facing hint for resolving the error.
    #[must_use]
    pub fn remediation(&self) -> Cow<'static, str> {
        match self {
            Self::Log(e) => Cow::Borrowed(e.remediation()),
            Self::Config(_) | Self::Access(_) => {
                Cow::Borrowed("Check that the settings file is readable and writable.")
            }
            Self::Forbidden { reason, .. } => Cow::Borrowed(reason.remediation()),
            Self::MissingCapability { capability } => Cow::Owned(format!(
                "Ask an administrator for the {capability} capability."
            )),
        }
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
