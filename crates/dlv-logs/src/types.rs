//! Result types returned by the log engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a tail request selects lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailMode {
    /// The most recent N lines.
    #[default]
    Lines,
    /// Lines from the most recent M minutes.
    Minutes,
}

impl fmt::Display for TailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Minutes => write!(f, "minutes"),
        }
    }
}

impl FromStr for TailMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "minutes" => Ok(Self::Minutes),
            other => Err(format!("unknown tail mode: {other}")),
        }
    }
}

/// Lines returned by a tail query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailResult {
    /// The mode that produced this result.
    pub mode: TailMode,
    /// Lines, oldest first.
    pub lines: Vec<String>,
    /// Number of lines in `lines`.
    pub line_count_returned: usize,
    /// Number of candidate lines read from the file.
    pub lines_scanned: usize,
    /// Set when time filtering met lines without a readable timestamp, so
    /// the result may hold lines outside the requested window.
    pub truncated_by_fallback: bool,
    /// Set when the whole candidate window was returned unfiltered.
    pub fell_back: bool,
}

impl TailResult {
    /// Lines joined with `\n`, as a single text block.
    #[must_use]
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns true if no lines were returned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Whole-file payload for a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    /// Suggested file name for the attachment.
    pub filename: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Number of bytes in `bytes`.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_mode_parses_case_insensitively() {
        assert_eq!("Lines".parse::<TailMode>(), Ok(TailMode::Lines));
        assert_eq!("MINUTES".parse::<TailMode>(), Ok(TailMode::Minutes));
        assert!("hours".parse::<TailMode>().is_err());
    }

    #[test]
    fn tail_result_content_joins_lines() {
        let result = TailResult {
            mode: TailMode::Lines,
            lines: vec!["a".into(), "b".into()],
            line_count_returned: 2,
            lines_scanned: 2,
            truncated_by_fallback: false,
            fell_back: false,
        };
        assert_eq!(result.content(), "a\nb");
        assert!(!result.is_empty());
    }

    #[test]
    fn tail_result_serializes_camel_case() {
        let result = TailResult {
            mode: TailMode::Minutes,
            lines: Vec::new(),
            line_count_returned: 0,
            lines_scanned: 7,
            truncated_by_fallback: true,
            fell_back: false,
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["mode"], "minutes");
        assert_eq!(json["linesScanned"], 7);
        assert_eq!(json["truncatedByFallback"], true);
    }
}
