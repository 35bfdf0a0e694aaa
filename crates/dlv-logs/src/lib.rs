//! # dlv-logs
//!
//! Log-tail engine for debug-log-viewer.
//!
//! This crate provides:
//!
//! - [`TimestampExtractor`]: Parses the `[YYYY-MM-DD HH:MM:SS]` prefix of a line
//! - [`TailReader`]: Reads the last N lines of a large file by seeking backwards
//! - [`WindowFilter`]: Keeps lines inside a time window, failing open on unparseable lines
//! - [`LogFileStats`]: Existence, size, mtime and permission probe
//! - [`LogEngine`]: Tail by lines / minutes, lock-guarded clear, size-guarded download
//!
//! ## Example
//!
//! ```rust,no_run
//! use dlv_logs::{LogEngine, LogTimezone};
//!
//! let engine = LogEngine::new("/var/www/wp-content/debug.log").with_timezone(LogTimezone::Utc);
//! let now = chrono::Utc::now().timestamp();
//! let recent = engine.tail_by_minutes_at(5, 1000, now)?;
//! for line in &recent.lines {
//!     println!("{line}");
//! }
//! # Ok::<(), dlv_logs::LogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod stats;
pub mod tail;
pub mod timestamp;
pub mod types;
pub mod window;

pub use engine::{LogEngine, DOWNLOAD_MAX_BYTES};
pub use error::{FileAccess, LogError, Result};
pub use stats::{format_bytes, LogFileStats};
pub use tail::TailReader;
pub use timestamp::{LogTimezone, TimestampExtractor};
pub use types::{DownloadPayload, TailMode, TailResult};
pub use window::{WindowFilter, WindowOutcome};
