//! Capability checks supplied by the host's authorization layer.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{AccessError, Result};

/// A named permission the caller may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read the log and its stats.
    View,
    /// Change grants and settings.
    Admin,
}

impl Capability {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "admin" => Ok(Self::Admin),
            other => Err(AccessError::UnknownCapability {
                name: other.to_string(),
            }),
        }
    }
}

/// Answers whether the current caller holds a capability.
pub trait CapabilityCheck: Send + Sync {
    /// Returns true if the caller holds `capability`.
    fn has_capability(&self, capability: Capability) -> bool;
}

impl<F> CapabilityCheck for F
where
    F: Fn(Capability) -> bool + Send + Sync,
{
    fn has_capability(&self, capability: Capability) -> bool {
        self(capability)
    }
}

/// A fixed set of granted capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    granted: HashSet<Capability>,
}

impl StaticCapabilities {
    /// Grants nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Grants every capability.
    #[must_use]
    pub fn all() -> Self {
        [Capability::View, Capability::Admin].into_iter().collect()
    }

    /// Parses a comma-separated list such as `view,admin`. Empty entries are skipped.
    pub fn parse_list(list: &str) -> Result<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Returns a copy that also grants `capability`.
    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.granted.insert(capability);
        self
    }
}

impl FromIterator<Capability> for StaticCapabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl CapabilityCheck for StaticCapabilities {
    fn has_capability(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}
