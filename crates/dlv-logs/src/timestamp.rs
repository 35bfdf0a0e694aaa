//! Leading-timestamp extraction for log lines.
//!
//! Lines written by the host application start with a bracketed, zone-less
//! date-time: `[2024-01-01 12:34:56] message`. The string carries no offset,
//! so the zone it was written in is an explicit choice of the caller (see
//! [`LogTimezone`]); nothing here tries to guess it.

use chrono::{LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Length of `YYYY-MM-DD HH:MM:SS`.
const DATETIME_LEN: usize = 19;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone in which the naive timestamps of the log were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTimezone {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Parses the `[YYYY-MM-DD HH:MM:SS]` prefix of a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampExtractor {
    zone: LogTimezone,
}

impl TimestampExtractor {
    /// Creates an extractor interpreting timestamps in `zone`.
    #[must_use]
    pub const fn new(zone: LogTimezone) -> Self {
        Self { zone }
    }

    /// Returns the zone timestamps are interpreted in.
    #[must_use]
    pub const fn zone(&self) -> LogTimezone {
        self.zone
    }

    /// Extracts the leading timestamp of `line` as epoch seconds.
    ///
    /// Returns `None` when the prefix is absent, malformed, names an invalid
    /// calendar date, or falls in a local-time gap. A local time that occurs
    /// twice (DST fold) resolves to the earlier instant.
    #[must_use]
    pub fn extract(&self, line: &str) -> Option<i64> {
        let naive = parse_prefix(line)?;
        match self.zone {
            LogTimezone::Utc => Some(Utc.from_utc_datetime(&naive).timestamp()),
            LogTimezone::Local => match chrono::Local.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Some(dt.timestamp()),
                LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp()),
                LocalResult::None => None,
            },
        }
    }
}

/// Matches `^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\]` and parses the inside.
fn parse_prefix(line: &str) -> Option<NaiveDateTime> {
    let bytes = line.as_bytes();
    if bytes.len() < DATETIME_LEN + 2 || bytes[0] != b'[' || bytes[DATETIME_LEN + 1] != b']' {
        return None;
    }
    let inner = &bytes[1..=DATETIME_LEN];
    let shape_ok = inner.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    // All bytes checked above are ASCII, so this slice is on char boundaries.
    NaiveDateTime::parse_from_str(&line[1..=DATETIME_LEN], DATETIME_FORMAT).ok()
}
