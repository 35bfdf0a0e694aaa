//! # dlv-access
//!
//! Decides who may clear or download the log, and when.
//!
//! - [`AccessPolicy`]: evaluates the environment, settings-flag and scope gates
//! - [`OverrideClock`]: the production override and temporary logging grants
//! - [`Clock`]: injected time, with [`ManualClock`] for tests
//! - [`CapabilityCheck`]: the host's view / admin capability answer
//!
//! ```rust
//! use dlv_access::{AccessContext, AccessPolicy, EnvironmentKind};
//! use dlv_config::Settings;
//!
//! let ctx = AccessContext::from_settings(EnvironmentKind::Production, false, &Settings::default());
//! let decision = AccessPolicy::evaluate(&ctx, 1_700_000_000);
//! assert!(!decision.can_clear);
//! ```

#![forbid(unsafe_code)]

pub mod capability;
pub mod clock;
pub mod environment;
pub mod error;
pub mod grant;
pub mod policy;

pub use capability::{Capability, CapabilityCheck, StaticCapabilities};
pub use clock::{Clock, ManualClock, SystemClock};
pub use environment::EnvironmentKind;
pub use error::{AccessError, Result};
pub use grant::{GRANT_DURATION_SECS, Grant, GrantKind, GrantState, OverrideClock};
pub use policy::{
    AccessContext, AccessDecision, AccessPolicy, AccessSnapshot, Action, DenialReason, Reasons,
    SnapshotReasons, TailDefaults,
};
