//! Time-bounded grants and the clock that manages them.
//!
//! A grant is just an expiry timestamp. It is active while `now < expires_at`
//! and nothing ever fires when it lapses: every check compares against the
//! injected [`Clock`] at the moment of asking.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dlv_config::{Settings, SettingsStore};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::error::{AccessError, Result};

/// Lifetime of a freshly enabled grant.
pub const GRANT_DURATION_SECS: i64 = 15 * 60;

/// A lazily evaluated, expiring elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Expiry in epoch seconds. `0` means never granted or disabled.
    pub expires_at: i64,
}

impl Grant {
    /// A grant expiring [`GRANT_DURATION_SECS`] after `now`.
    #[must_use]
    pub const fn enable(now: i64) -> Self {
        Self {
            expires_at: now + GRANT_DURATION_SECS,
        }
    }

    /// An inactive grant.
    #[must_use]
    pub const fn disable() -> Self {
        Self { expires_at: 0 }
    }

    /// Returns true while `now` is strictly before the expiry.
    #[must_use]
    pub const fn is_active(self, now: i64) -> bool {
        now < self.expires_at
    }

    /// The expiry if still active at `now`, otherwise 0.
    #[must_use]
    pub const fn live_expiry(self, now: i64) -> i64 {
        if self.is_active(now) { self.expires_at } else { 0 }
    }
}

/// The two independent grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    /// Lifts the production default-deny on clear and download.
    ProductionOverride,
    /// Turns log writing on without touching the host's static switch.
    TempLogging,
}

impl GrantKind {
    /// Reads this grant out of a settings record.
    #[must_use]
    pub const fn read(self, settings: &Settings) -> Grant {
        let expires_at = match self {
            Self::ProductionOverride => settings.production_override_expires_at,
            Self::TempLogging => settings.temp_logging_expires_at,
        };
        Grant { expires_at }
    }

    /// Writes this grant into a settings record.
    pub fn write(self, settings: &mut Settings, grant: Grant) {
        match self {
            Self::ProductionOverride => settings.production_override_expires_at = grant.expires_at,
            Self::TempLogging => settings.temp_logging_expires_at = grant.expires_at,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductionOverride => "production override",
            Self::TempLogging => "temporary logging",
        }
    }

    /// Confirmation message for a state change.
    #[must_use]
    pub const fn message(self, state: GrantState) -> &'static str {
        match (self, state) {
            (Self::ProductionOverride, GrantState::Enable) => {
                "production override enabled for 15 minutes"
            }
            (Self::ProductionOverride, GrantState::Disable) => "production override disabled",
            (Self::TempLogging, GrantState::Enable) => "temporary logging enabled for 15 minutes",
            (Self::TempLogging, GrantState::Disable) => "temporary logging disabled",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Requested grant transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    /// Start a fresh 15-minute window.
    Enable,
    /// End the grant now.
    Disable,
}

impl FromStr for GrantState {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enable" | "on" => Ok(Self::Enable),
            "disable" | "off" => Ok(Self::Disable),
            other => Err(AccessError::InvalidGrantState {
                value: other.to_string(),
            }),
        }
    }
}

/// Manages both grants over a settings store and a clock.
///
/// Grants live in the settings record so they survive restarts.
#[derive(Clone)]
pub struct OverrideClock {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for OverrideClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideClock").finish_non_exhaustive()
    }
}

impl OverrideClock {
    /// Creates a grant manager.
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current time from the injected clock.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Applies `state` to `kind` and persists it. Returns the stored grant.
    pub fn apply(&self, kind: GrantKind, state: GrantState) -> Result<Grant> {
        match state {
            GrantState::Enable => self.enable(kind),
            GrantState::Disable => self.disable(kind),
        }
    }

    /// Starts a fresh 15-minute grant, replacing any existing one.
    pub fn enable(&self, kind: GrantKind) -> Result<Grant> {
        let grant = Grant::enable(self.clock.now());
        self.store.update(&mut |s| kind.write(s, grant))?;
        info!(
            target: "dlv_audit",
            grant = %kind,
            expires_at = grant.expires_at,
            "grant enabled"
        );
        Ok(grant)
    }

    /// Ends the grant immediately.
    pub fn disable(&self, kind: GrantKind) -> Result<Grant> {
        let grant = Grant::disable();
        self.store.update(&mut |s| kind.write(s, grant))?;
        info!(target: "dlv_audit", grant = %kind, "grant disabled");
        Ok(grant)
    }

    /// The stored grant for `kind`, active or not.
    pub fn grant(&self, kind: GrantKind) -> Result<Grant> {
        Ok(kind.read(&self.store.get()?))
    }

    /// Returns true if `kind` is active right now.
    pub fn is_active(&self, kind: GrantKind) -> Result<bool> {
        Ok(self.grant(kind)?.is_active(self.clock.now()))
    }

    /// Expiry of `kind` if active, otherwise 0.
    pub fn expires_at(&self, kind: GrantKind) -> Result<i64> {
        Ok(self.grant(kind)?.live_expiry(self.clock.now()))
    }

    /// Whether the host should be writing log entries right now.
    pub fn logging_effective(&self) -> Result<bool> {
        let settings = self.store.get()?;
        Ok(settings.log_writes_enabled
            || GrantKind::TempLogging
                .read(&settings)
                .is_active(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use dlv_config::MemorySettingsStore;
    use proptest::prelude::*;
    use test_case::test_case;

    const T0: i64 = 1_700_000_000;

    fn fixture() -> (OverrideClock, Arc<ManualClock>, Arc<MemorySettingsStore>) {
        let clock = Arc::new(ManualClock::new(T0));
        let store = Arc::new(MemorySettingsStore::default());
        let grants = OverrideClock::new(store.clone(), clock.clone());
        (grants, clock, store)
    }

    #[test]
    fn grant_active_until_expiry() {
        let grant = Grant::enable(T0);
        assert_eq!(grant.expires_at, T0 + 900);
        assert!(grant.is_active(T0));
        assert!(grant.is_active(T0 + 899));
        assert!(!grant.is_active(T0 + 900));
        assert!(!Grant::disable().is_active(T0));
    }

    #[test]
    fn live_expiry_is_zero_once_lapsed() {
        let grant = Grant::enable(T0);
        assert_eq!(grant.live_expiry(T0), T0 + 900);
        assert_eq!(grant.live_expiry(T0 + 901), 0);
    }

    #[test_case(GrantKind::ProductionOverride)]
    #[test_case(GrantKind::TempLogging)]
    fn enable_then_expire(kind: GrantKind) {
        let (grants, clock, _) = fixture();
        grants.enable(kind).expect("enable");
        assert!(grants.is_active(kind).expect("active"));
        assert_eq!(grants.expires_at(kind).expect("expiry"), T0 + 900);

        clock.advance(901);
        assert!(!grants.is_active(kind).expect("lapsed"));
        assert_eq!(grants.expires_at(kind).expect("expiry"), 0);
    }

    #[test]
    fn grants_are_independent() {
        let (grants, _, store) = fixture();
        grants.enable(GrantKind::TempLogging).expect("enable");
        assert!(!grants.is_active(GrantKind::ProductionOverride).expect("check"));

        let settings = store.get().expect("get");
        assert_eq!(settings.production_override_expires_at, 0);
        assert_eq!(settings.temp_logging_expires_at, T0 + 900);
    }

    #[test]
    fn disable_clears_expiry() {
        let (grants, _, store) = fixture();
        grants.enable(GrantKind::ProductionOverride).expect("enable");
        grants.disable(GrantKind::ProductionOverride).expect("disable");
        assert!(!grants.is_active(GrantKind::ProductionOverride).expect("check"));
        assert_eq!(store.get().expect("get").production_override_expires_at, 0);
    }

    #[test]
    fn re_enable_restarts_window() {
        let (grants, clock, _) = fixture();
        grants.enable(GrantKind::ProductionOverride).expect("enable");
        clock.advance(600);
        let grant = grants
            .apply(GrantKind::ProductionOverride, GrantState::Enable)
            .expect("re-enable");
        assert_eq!(grant.expires_at, T0 + 600 + 900);
    }

    #[test]
    fn logging_effective_follows_static_switch_or_grant() {
        let (grants, clock, store) = fixture();
        assert!(!grants.logging_effective().expect("check"));

        grants.enable(GrantKind::TempLogging).expect("enable");
        assert!(grants.logging_effective().expect("check"));
        clock.advance(900);
        assert!(!grants.logging_effective().expect("check"));

        store
            .update(&mut |s| s.log_writes_enabled = true)
            .expect("update");
        assert!(grants.logging_effective().expect("check"));
    }

    #[test_case("enable", GrantState::Enable)]
    #[test_case("DISABLE", GrantState::Disable)]
    #[test_case("on", GrantState::Enable)]
    fn grant_state_parses(raw: &str, expected: GrantState) {
        assert_eq!(raw.parse::<GrantState>().expect("state"), expected);
    }

    #[test]
    fn grant_state_rejects_other() {
        assert!(matches!(
            "toggle".parse::<GrantState>(),
            Err(AccessError::InvalidGrantState { .. })
        ));
    }

    proptest! {
        #[test]
        fn enabled_grant_active_exactly_for_duration(now in 0i64..4_000_000_000, offset in 0i64..2_000) {
            let grant = Grant::enable(now);
            prop_assert_eq!(grant.is_active(now + offset), offset < GRANT_DURATION_SECS);
        }
    }
}
