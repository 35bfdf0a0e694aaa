//! Request and response shapes.

use dlv_access::{AccessSnapshot, CapabilityCheck};
use dlv_logs::{LogFileStats, TailMode, TailResult};
use serde::Serialize;

/// Who is asking and from where.
#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    /// The caller's capabilities.
    pub capabilities: &'a dyn CapabilityCheck,
    /// Whether the caller acts from a sub-scope.
    pub sub_scope: bool,
}

impl<'a> RequestContext<'a> {
    /// A top-level caller.
    #[must_use]
    pub fn new(capabilities: &'a dyn CapabilityCheck) -> Self {
        Self {
            capabilities,
            sub_scope: false,
        }
    }

    /// Marks the caller as acting from a sub-scope.
    #[must_use]
    pub const fn in_sub_scope(mut self, sub_scope: bool) -> Self {
        self.sub_scope = sub_scope;
        self
    }
}

/// A tail request. A missing `value` means the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TailQuery {
    /// Lines or minutes.
    pub mode: TailMode,
    /// Line count or minutes, depending on `mode`.
    pub value: Option<i64>,
}

impl TailQuery {
    /// The last `n` lines.
    #[must_use]
    pub const fn lines(n: i64) -> Self {
        Self {
            mode: TailMode::Lines,
            value: Some(n),
        }
    }

    /// The last `m` minutes.
    #[must_use]
    pub const fn minutes(m: i64) -> Self {
        Self {
            mode: TailMode::Minutes,
            value: Some(m),
        }
    }
}

/// Response to a tail request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailResponse {
    /// The selected lines.
    pub tail: TailResult,
    /// File attributes at the time of the read.
    pub stats: LogFileStats,
    /// Access state at the time of the read.
    pub access: AccessSnapshot,
}

/// Response to a stats request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// File attributes.
    pub stats: LogFileStats,
    /// Access state.
    pub access: AccessSnapshot,
}

/// Response to a successful clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    /// Always true.
    pub cleared: bool,
    /// RFC 3339 time of the clear.
    pub cleared_at: String,
}

/// Response to a grant toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
    /// New expiry, 0 after a disable.
    pub expires_at: i64,
    /// Access state after the change.
    pub access: AccessSnapshot,
}
