//! Deployment environment classification.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The kind of environment the viewer runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Live site. Clear and download are off unless overridden.
    #[default]
    Production,
    /// Pre-release copy of production.
    Staging,
    /// Developer machine.
    Development,
    /// A named non-production environment such as `local`.
    Other,
}

impl EnvironmentKind {
    /// Returns true for [`EnvironmentKind::Production`].
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentKind {
    type Err = Infallible;

    /// Unrecognized names, including the empty string, map to
    /// [`EnvironmentKind::Production`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            "development" | "dev" => Self::Development,
            "local" | "other" => Self::Other,
            _ => {
                warn!(environment = s, "unrecognized environment, treating as production");
                Self::Production
            }
        })
    }
}
