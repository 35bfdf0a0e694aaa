//! Time-window filtering of a line buffer.

use crate::timestamp::TimestampExtractor;

/// Outcome of [`WindowFilter::filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOutcome {
    /// Lines kept, in input order.
    pub kept: Vec<String>,
    /// Whether at least one input line had no parseable timestamp.
    pub any_unparseable: bool,
    /// Whether the whole input was returned because nothing survived
    /// filtering and timestamps could not be read.
    pub fell_back: bool,
}

/// Partitions lines into in-window and out-of-window by leading timestamp.
///
/// A line without a timestamp is always kept. A line with one is kept iff
/// its timestamp is at or after the threshold. When that leaves nothing and
/// at least one line was unparseable, the full input is returned instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowFilter {
    extractor: TimestampExtractor,
}

impl WindowFilter {
    /// Creates a filter using `extractor` to read line timestamps.
    #[must_use]
    pub const fn new(extractor: TimestampExtractor) -> Self {
        Self { extractor }
    }

    /// Filters `lines` against `threshold` (epoch seconds, inclusive).
    #[must_use]
    pub fn filter(&self, lines: Vec<String>, threshold: i64) -> WindowOutcome {
        let mut any_unparseable = false;
        let mut keep = Vec::with_capacity(lines.len());
        for line in &lines {
            let keep_line = match self.extractor.extract(line) {
                Some(ts) => ts >= threshold,
                None => {
                    any_unparseable = true;
                    true
                }
            };
            keep.push(keep_line);
        }

        // Unreachable while unparseable lines are always kept.
        if any_unparseable && !keep.iter().any(|&k| k) {
            return WindowOutcome {
                kept: lines,
                any_unparseable,
                fell_back: true,
            };
        }

        let kept = lines
            .into_iter()
            .zip(keep)
            .filter_map(|(line, k)| k.then_some(line))
            .collect();
        WindowOutcome {
            kept,
            any_unparseable,
            fell_back: false,
        }
    }
}
