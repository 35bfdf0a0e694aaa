//! The persisted settings record and its read-time normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Hard ceiling for lines read in one request.
pub const MAX_LINES_CEILING: u32 = 1000;
/// Upper bound for the default minutes window.
pub const MAX_DEFAULT_MINUTES: u32 = 120;
/// Bounds for the client auto-refresh interval.
pub const AUTO_REFRESH_RANGE: (u32, u32) = (2, 120);

/// Viewer settings as persisted.
///
/// Values are stored exactly as written. Call [`Settings::normalized`] before
/// using them; ranges are enforced there, not on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Lines shown when a tail request names no count.
    pub default_lines: u32,
    /// Minutes shown when a minutes request names no window.
    pub default_minutes: u32,
    /// Maximum lines returned (and scanned) per request.
    pub max_lines: u32,
    /// Client auto-refresh interval.
    pub auto_refresh_interval_seconds: u32,
    /// Whether downloading the log is offered at all.
    pub download_enabled: bool,
    /// Whether sub-scope administrators may clear or download.
    pub allow_sub_scope_actions: bool,
    /// Expiry of the production override grant, epoch seconds (0 = inactive).
    pub production_override_expires_at: i64,
    /// Expiry of the temporary logging grant, epoch seconds (0 = inactive).
    pub temp_logging_expires_at: i64,
    /// The host application's static logging switch.
    pub log_writes_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_lines: 50,
            default_minutes: 5,
            max_lines: MAX_LINES_CEILING,
            auto_refresh_interval_seconds: 5,
            download_enabled: true,
            allow_sub_scope_actions: false,
            production_override_expires_at: 0,
            temp_logging_expires_at: 0,
            log_writes_enabled: false,
        }
    }
}

impl Settings {
    /// Returns a copy with every numeric field clamped into range.
    ///
    /// `max_lines` goes to `1..=1000`, then `default_lines` to
    /// `1..=max_lines`, so `default_lines <= max_lines` always holds on the
    /// result.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max_lines = self.max_lines.clamp(1, MAX_LINES_CEILING);
        Self {
            default_lines: self.default_lines.clamp(1, max_lines),
            default_minutes: self.default_minutes.clamp(1, MAX_DEFAULT_MINUTES),
            max_lines,
            auto_refresh_interval_seconds: self
                .auto_refresh_interval_seconds
                .clamp(AUTO_REFRESH_RANGE.0, AUTO_REFRESH_RANGE.1),
            ..self.clone()
        }
    }

    /// Sets one field from its textual form.
    pub fn set_value(&mut self, key: SettingKey, raw: &str) -> Result<()> {
        match key {
            SettingKey::DefaultLines => self.default_lines = parse_u32(key, raw)?,
            SettingKey::DefaultMinutes => self.default_minutes = parse_u32(key, raw)?,
            SettingKey::MaxLines => self.max_lines = parse_u32(key, raw)?,
            SettingKey::AutoRefreshIntervalSeconds => {
                self.auto_refresh_interval_seconds = parse_u32(key, raw)?;
            }
            SettingKey::DownloadEnabled => self.download_enabled = parse_bool(key, raw)?,
            SettingKey::AllowSubScopeActions => {
                self.allow_sub_scope_actions = parse_bool(key, raw)?;
            }
            SettingKey::LogWritesEnabled => self.log_writes_enabled = parse_bool(key, raw)?,
        }
        Ok(())
    }
}

/// Operator-editable settings keys.
///
/// Grant expiries are deliberately absent: they change only through the
/// enable / disable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// `defaultLines`
    DefaultLines,
    /// `defaultMinutes`
    DefaultMinutes,
    /// `maxLines`
    MaxLines,
    /// `autoRefreshIntervalSeconds`
    AutoRefreshIntervalSeconds,
    /// `downloadEnabled`
    DownloadEnabled,
    /// `allowSubScopeActions`
    AllowSubScopeActions,
    /// `logWritesEnabled`
    LogWritesEnabled,
}

impl SettingKey {
    /// All editable keys.
    pub const ALL: [Self; 7] = [
        Self::DefaultLines,
        Self::DefaultMinutes,
        Self::MaxLines,
        Self::AutoRefreshIntervalSeconds,
        Self::DownloadEnabled,
        Self::AllowSubScopeActions,
        Self::LogWritesEnabled,
    ];

    /// The persisted (camelCase) name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DefaultLines => "defaultLines",
            Self::DefaultMinutes => "defaultMinutes",
            Self::MaxLines => "maxLines",
            Self::AutoRefreshIntervalSeconds => "autoRefreshIntervalSeconds",
            Self::DownloadEnabled => "downloadEnabled",
            Self::AllowSubScopeActions => "allowSubScopeActions",
            Self::LogWritesEnabled => "logWritesEnabled",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    /// Accepts the camelCase name or its snake_case / kebab-case spelling.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_u32(key: SettingKey, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

fn parse_bool(key: SettingKey, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.default_lines, 50);
        assert_eq!(s.default_minutes, 5);
        assert_eq!(s.max_lines, 1000);
        assert_eq!(s.production_override_expires_at, 0);
        assert_eq!(s.temp_logging_expires_at, 0);
        assert!(!s.allow_sub_scope_actions);
    }

    #[test]
    fn normalized_clamps_default_lines_to_max_lines() {
        let s = Settings {
            default_lines: 800,
            max_lines: 200,
            ..Settings::default()
        };
        let n = s.normalized();
        assert_eq!(n.max_lines, 200);
        assert_eq!(n.default_lines, 200);
        // Stored value is untouched.
        assert_eq!(s.default_lines, 800);
    }

    #[test_case(0, 1 ; "zero max lines")]
    #[test_case(5000, 1000 ; "above ceiling")]
    #[test_case(300, 300 ; "in range")]
    fn normalized_max_lines(raw: u32, expected: u32) {
        let s = Settings {
            max_lines: raw,
            ..Settings::default()
        };
        assert_eq!(s.normalized().max_lines, expected);
    }

    #[test]
    fn normalized_clamps_minutes_and_refresh() {
        let s = Settings {
            default_minutes: 0,
            auto_refresh_interval_seconds: 1000,
            default_lines: 0,
            ..Settings::default()
        };
        let n = s.normalized();
        assert_eq!(n.default_minutes, 1);
        assert_eq!(n.auto_refresh_interval_seconds, 120);
        assert_eq!(n.default_lines, 1);
    }

    #[test]
    fn normalized_keeps_flags_and_grants() {
        let s = Settings {
            download_enabled: false,
            allow_sub_scope_actions: true,
            production_override_expires_at: 42,
            temp_logging_expires_at: 7,
            ..Settings::default()
        };
        let n = s.normalized();
        assert!(!n.download_enabled);
        assert!(n.allow_sub_scope_actions);
        assert_eq!(n.production_override_expires_at, 42);
        assert_eq!(n.temp_logging_expires_at, 7);
    }

    #[test]
    fn deserialize_fills_missing_keys_and_ignores_unknown() {
        let s: Settings =
            serde_json::from_str(r#"{"maxLines": 300, "colour": "red"}"#).expect("parse");
        assert_eq!(s.max_lines, 300);
        assert_eq!(s.default_lines, 50);
    }

    #[test_case("maxLines", SettingKey::MaxLines)]
    #[test_case("max_lines", SettingKey::MaxLines)]
    #[test_case("download-enabled", SettingKey::DownloadEnabled)]
    #[test_case("ALLOWSUBSCOPEACTIONS", SettingKey::AllowSubScopeActions)]
    fn setting_key_parses_spellings(raw: &str, expected: SettingKey) {
        assert_eq!(raw.parse::<SettingKey>().expect("key"), expected);
    }

    #[test]
    fn setting_key_rejects_grant_expiry() {
        let err = "productionOverrideExpiresAt"
            .parse::<SettingKey>()
            .expect_err("not editable");
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_value_parses_types() {
        let mut s = Settings::default();
        s.set_value(SettingKey::MaxLines, "250").expect("int");
        s.set_value(SettingKey::DownloadEnabled, "off").expect("bool");
        assert_eq!(s.max_lines, 250);
        assert!(!s.download_enabled);

        let err = s
            .set_value(SettingKey::DefaultLines, "-3")
            .expect_err("negative");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = s
            .set_value(SettingKey::LogWritesEnabled, "maybe")
            .expect_err("not a bool");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
