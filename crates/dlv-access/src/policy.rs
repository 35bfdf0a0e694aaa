//! Clear / download permission evaluation.
//!
//! Permissions are the conjunction of independent gates, applied in order:
//!
//! 1. base: clear allowed, download follows `downloadEnabled`
//! 2. production without an active override denies both
//! 3. `downloadEnabled == false` denies download
//! 4. sub-scope callers without `allowSubScopeActions` are denied both
//!
//! A gate can only deny. Each denial is recorded against the action with the
//! gate that caused it, so the caller can explain every refusal.

use std::fmt;

use dlv_config::Settings;
use serde::{Serialize, Serializer};

use crate::environment::EnvironmentKind;
use crate::grant::{Grant, GrantKind};

/// Everything the policy needs to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    /// Where the viewer runs.
    pub environment: EnvironmentKind,
    /// Whether the caller acts from a sub-scope (e.g. one tenant of many).
    pub is_sub_scope: bool,
    /// Normalized settings snapshot.
    pub settings: Settings,
    /// Production override grant, if one was ever issued.
    pub override_grant: Option<Grant>,
}

impl AccessContext {
    /// Builds a context, reading the override grant out of `settings`.
    #[must_use]
    pub fn from_settings(
        environment: EnvironmentKind,
        is_sub_scope: bool,
        settings: &Settings,
    ) -> Self {
        let settings = settings.normalized();
        let grant = GrantKind::ProductionOverride.read(&settings);
        Self {
            environment,
            is_sub_scope,
            override_grant: (grant.expires_at > 0).then_some(grant),
            settings,
        }
    }

    fn override_active(&self, now: i64) -> bool {
        self.override_grant.is_some_and(|g| g.is_active(now))
    }
}

/// The gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Truncate the log.
    Clear,
    /// Download the whole log.
    Download,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::Download => f.write_str("download"),
        }
    }
}

/// Why an action was denied. One per gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Production environment and no active override.
    ProductionDefault,
    /// Turned off in settings.
    DisabledByConfiguration,
    /// Sub-scope callers are not allowed to act.
    RequiresTopLevelScope,
}

impl DenialReason {
    /// Stable machine identifier.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ProductionDefault => "production_default",
            Self::DisabledByConfiguration => "disabled_by_configuration",
            Self::RequiresTopLevelScope => "requires_top_level_scope",
        }
    }

    /// User-facing explanation for `action`.
    #[must_use]
    pub fn message(self, action: Action) -> String {
        match self {
            Self::ProductionDefault => format!(
                "{action} is disabled in production; enable the 15-minute override to allow it"
            ),
            Self::DisabledByConfiguration => format!("{action} is disabled in settings"),
            Self::RequiresTopLevelScope => {
                format!("{action} is only available to top-level administrators")
            }
        }
    }

    /// What an operator can do about it.
    #[must_use]
    pub const fn remediation(self) -> &'static str {
        match self {
            Self::ProductionDefault => "Enable the production override, then retry within 15 minutes.",
            Self::DisabledByConfiguration => "Turn the action on in the viewer settings.",
            Self::RequiresTopLevelScope => {
                "Retry from the top-level scope, or set allowSubScopeActions."
            }
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for DenialReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Denials recorded against one action, in gate order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Reasons(Vec<DenialReason>);

impl Reasons {
    fn push(&mut self, reason: DenialReason) {
        self.0.push(reason);
    }

    /// The most specific denial: the one from the last gate that fired.
    #[must_use]
    pub fn primary(&self) -> Option<DenialReason> {
        self.0.last().copied()
    }

    /// All denials, first gate first.
    #[must_use]
    pub fn all(&self) -> &[DenialReason] {
        &self.0
    }

    /// Returns true if no gate denied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `reason` is among the denials.
    #[must_use]
    pub fn contains(&self, reason: DenialReason) -> bool {
        self.0.contains(&reason)
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    /// Whether clearing is allowed.
    pub can_clear: bool,
    /// Whether downloading is allowed.
    pub can_download: bool,
    /// Denials against clear.
    pub clear_reasons: Reasons,
    /// Denials against download.
    pub download_reasons: Reasons,
}

impl AccessDecision {
    /// Whether `action` is allowed.
    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::Clear => self.can_clear,
            Action::Download => self.can_download,
        }
    }

    /// Denials against `action`.
    #[must_use]
    pub const fn reasons(&self, action: Action) -> &Reasons {
        match action {
            Action::Clear => &self.clear_reasons,
            Action::Download => &self.download_reasons,
        }
    }

    fn deny(&mut self, action: Action, reason: DenialReason) {
        match action {
            Action::Clear => {
                self.can_clear = false;
                self.clear_reasons.push(reason);
            }
            Action::Download => {
                self.can_download = false;
                self.download_reasons.push(reason);
            }
        }
    }
}

/// Stateless policy evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Evaluates `ctx` at time `now`.
    #[must_use]
    pub fn evaluate(ctx: &AccessContext, now: i64) -> AccessDecision {
        let settings = &ctx.settings;
        let mut decision = AccessDecision {
            can_clear: true,
            can_download: settings.download_enabled,
            clear_reasons: Reasons::default(),
            download_reasons: Reasons::default(),
        };

        if ctx.environment.is_production() && !ctx.override_active(now) {
            decision.deny(Action::Clear, DenialReason::ProductionDefault);
            decision.deny(Action::Download, DenialReason::ProductionDefault);
        }

        if !settings.download_enabled {
            decision.deny(Action::Download, DenialReason::DisabledByConfiguration);
        }

        if ctx.is_sub_scope && !settings.allow_sub_scope_actions {
            decision.deny(Action::Clear, DenialReason::RequiresTopLevelScope);
            decision.deny(Action::Download, DenialReason::RequiresTopLevelScope);
        }

        decision
    }
}

/// Normalized tail defaults reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailDefaults {
    /// Default line count.
    pub lines: u32,
    /// Default minutes window.
    pub minutes: u32,
    /// Ceiling for line count.
    pub max_lines: u32,
}

/// Access state attached to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSnapshot {
    /// Where the viewer runs.
    pub environment: EnvironmentKind,
    /// Shorthand for `environment == production`.
    pub is_production: bool,
    /// Whether the production override is live.
    pub override_active: bool,
    /// Override expiry, 0 when inactive.
    pub override_expires_at: i64,
    /// Whether temporary logging is live.
    pub temp_logging_active: bool,
    /// Temporary logging expiry, 0 when inactive.
    pub temp_logging_expires_at: i64,
    /// `logWritesEnabled || tempLoggingActive`.
    pub logging_effective: bool,
    /// Always true; the view check happens before a snapshot is taken.
    pub can_view: bool,
    /// Whether clearing is allowed.
    pub can_clear: bool,
    /// Whether downloading is allowed.
    pub can_download: bool,
    /// Denials per action.
    pub reasons: SnapshotReasons,
    /// Normalized tail defaults.
    pub defaults: TailDefaults,
    /// Normalized client refresh interval.
    pub auto_refresh_interval_seconds: u32,
    /// Raw `downloadEnabled` flag.
    pub download_enabled_setting: bool,
    /// Raw `allowSubScopeActions` flag.
    pub allow_sub_scope_actions_setting: bool,
}

/// Per-action denials in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotReasons {
    /// Denials against clear.
    pub clear: Reasons,
    /// Denials against download.
    pub download: Reasons,
}

impl AccessSnapshot {
    /// Evaluates `ctx` at `now` and collects the full snapshot.
    ///
    /// Callers must already have passed the view capability check.
    #[must_use]
    pub fn capture(ctx: &AccessContext, now: i64) -> Self {
        let decision = AccessPolicy::evaluate(ctx, now);
        let settings = &ctx.settings;
        let override_grant = ctx.override_grant.unwrap_or_default();
        let temp = GrantKind::TempLogging.read(settings);
        let temp_logging_active = temp.is_active(now);

        Self {
            environment: ctx.environment,
            is_production: ctx.environment.is_production(),
            override_active: override_grant.is_active(now),
            override_expires_at: override_grant.live_expiry(now),
            temp_logging_active,
            temp_logging_expires_at: temp.live_expiry(now),
            logging_effective: settings.log_writes_enabled || temp_logging_active,
            can_view: true,
            can_clear: decision.can_clear,
            can_download: decision.can_download,
            reasons: SnapshotReasons {
                clear: decision.clear_reasons,
                download: decision.download_reasons,
            },
            defaults: TailDefaults {
                lines: settings.default_lines,
                minutes: settings.default_minutes,
                max_lines: settings.max_lines,
            },
            auto_refresh_interval_seconds: settings.auto_refresh_interval_seconds,
            download_enabled_setting: settings.download_enabled,
            allow_sub_scope_actions_setting: settings.allow_sub_scope_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const NOW: i64 = 1_700_000_000;

    fn ctx(
        env: EnvironmentKind,
        download_enabled: bool,
        sub_scope: bool,
        allow_sub: bool,
    ) -> AccessContext {
        AccessContext {
            environment: env,
            is_sub_scope: sub_scope,
            settings: Settings {
                download_enabled,
                allow_sub_scope_actions: allow_sub,
                ..Settings::default()
            },
            override_grant: None,
        }
    }

    #[test_case(true ; "download enabled")]
    #[test_case(false ; "download disabled")]
    fn production_without_override_denies_both(download_enabled: bool) {
        let c = ctx(EnvironmentKind::Production, download_enabled, false, false);
        let d = AccessPolicy::evaluate(&c, NOW);
        assert!(!d.can_clear);
        assert!(!d.can_download);
        assert!(d.clear_reasons.contains(DenialReason::ProductionDefault));
    }

    #[test]
    fn development_with_download_disabled() {
        let c = ctx(EnvironmentKind::Development, false, false, false);
        let d = AccessPolicy::evaluate(&c, NOW);
        assert!(d.can_clear);
        assert!(!d.can_download);
        assert!(d.clear_reasons.is_empty());
        assert_eq!(d.download_reasons.primary(), Some(DenialReason::DisabledByConfiguration));
    }

    #[test]
    fn production_with_active_override_allows() {
        let mut c = ctx(EnvironmentKind::Production, true, false, false);
        c.override_grant = Some(Grant::enable(NOW - 60));
        let d = AccessPolicy::evaluate(&c, NOW);
        assert!(d.can_clear);
        assert!(d.can_download);
    }

    #[test]
    fn production_with_lapsed_override_denies() {
        let mut c = ctx(EnvironmentKind::Production, true, false, false);
        c.override_grant = Some(Grant::enable(NOW - 900));
        let d = AccessPolicy::evaluate(&c, NOW);
        assert!(!d.can_clear);
        assert_eq!(d.clear_reasons.primary(), Some(DenialReason::ProductionDefault));
    }

    #[test]
    fn reasons_stack_in_gate_order() {
        let c = ctx(EnvironmentKind::Production, false, true, false);
        let d = AccessPolicy::evaluate(&c, NOW);
        assert_eq!(
            d.download_reasons.all(),
            &[
                DenialReason::ProductionDefault,
                DenialReason::DisabledByConfiguration,
                DenialReason::RequiresTopLevelScope,
            ]
        );
        assert_eq!(d.download_reasons.primary(), Some(DenialReason::RequiresTopLevelScope));
        assert_eq!(
            d.clear_reasons.all(),
            &[DenialReason::ProductionDefault, DenialReason::RequiresTopLevelScope]
        );
    }

    #[test_case(false, false, true ; "top level")]
    #[test_case(true, false, false ; "sub scope not allowed")]
    #[test_case(true, true, true ; "sub scope allowed")]
    fn sub_scope_gate(sub_scope: bool, allow_sub: bool, allowed: bool) {
        let c = ctx(EnvironmentKind::Staging, true, sub_scope, allow_sub);
        let d = AccessPolicy::evaluate(&c, NOW);
        assert_eq!(d.can_clear, allowed);
        assert_eq!(d.can_download, allowed);
        assert_eq!(d.allows(Action::Clear), allowed);
    }

    #[test]
    fn from_settings_reads_override_and_normalizes() {
        let settings = Settings {
            production_override_expires_at: NOW + 100,
            max_lines: 0,
            ..Settings::default()
        };
        let c = AccessContext::from_settings(EnvironmentKind::Production, false, &settings);
        assert_eq!(c.override_grant, Some(Grant { expires_at: NOW + 100 }));
        assert_eq!(c.settings.max_lines, 1);

        let c = AccessContext::from_settings(EnvironmentKind::Production, false, &Settings::default());
        assert_eq!(c.override_grant, None);
    }

    #[test]
    fn snapshot_reports_grants_and_defaults() {
        let settings = Settings {
            production_override_expires_at: NOW + 300,
            temp_logging_expires_at: NOW - 1,
            default_lines: 2000,
            max_lines: 400,
            ..Settings::default()
        };
        let c = AccessContext::from_settings(EnvironmentKind::Production, false, &settings);
        let snap = AccessSnapshot::capture(&c, NOW);

        assert!(snap.is_production);
        assert!(snap.override_active);
        assert_eq!(snap.override_expires_at, NOW + 300);
        assert!(!snap.temp_logging_active);
        assert_eq!(snap.temp_logging_expires_at, 0);
        assert!(!snap.logging_effective);
        assert!(snap.can_view);
        assert!(snap.can_clear);
        assert_eq!(snap.defaults.lines, 400);
        assert_eq!(snap.defaults.max_lines, 400);
    }

    #[test]
    fn snapshot_serializes_reason_codes() {
        let c = ctx(EnvironmentKind::Production, true, false, false);
        let json = serde_json::to_value(AccessSnapshot::capture(&c, NOW)).expect("serialize");
        assert_eq!(json["canClear"], false);
        assert_eq!(json["reasons"]["clear"][0], "production_default");
        assert_eq!(json["environment"], "production");
        assert_eq!(json["defaults"]["maxLines"], 1000);
    }

    #[test]
    fn denial_messages_name_the_action() {
        assert!(DenialReason::ProductionDefault.message(Action::Clear).starts_with("clear"));
        assert!(
            DenialReason::DisabledByConfiguration
                .message(Action::Download)
                .contains("settings")
        );
    }

    fn env_strategy() -> impl Strategy<Value = EnvironmentKind> {
        prop_oneof![
            Just(EnvironmentKind::Production),
            Just(EnvironmentKind::Staging),
            Just(EnvironmentKind::Development),
            Just(EnvironmentKind::Other),
        ]
    }

    proptest! {
        #[test]
        fn allowed_iff_no_reasons(
            env in env_strategy(),
            download_enabled in any::<bool>(),
            sub_scope in any::<bool>(),
            allow_sub in any::<bool>(),
            grant_offset in proptest::option::of(-2_000i64..2_000),
        ) {
            let mut c = ctx(env, download_enabled, sub_scope, allow_sub);
            c.override_grant = grant_offset.map(|o| Grant { expires_at: NOW + o });
            let d = AccessPolicy::evaluate(&c, NOW);
            prop_assert_eq!(d.can_clear, d.clear_reasons.is_empty());
            prop_assert_eq!(d.can_download, d.download_reasons.is_empty());
            // Every gate that denies clear also denies download.
            if d.can_download {
                prop_assert!(d.can_clear);
            }
        }
    }
}
