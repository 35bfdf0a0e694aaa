//! [`LogEngine`]: tail queries, clear and download over a single log file.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::error::{FileAccess, LogError, Result};
use crate::stats::{probe_writable, LogFileStats};
use crate::tail::TailReader;
use crate::timestamp::{LogTimezone, TimestampExtractor};
use crate::types::{DownloadPayload, TailMode, TailResult};
use crate::window::WindowFilter;

/// Largest file `prepare_download` will load.
pub const DOWNLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Attachment name used when the log path has no file name.
const DEFAULT_FILENAME: &str = "debug.log";

/// Answers tail, clear and download requests for one log file.
///
/// The engine holds no state between calls beyond its configuration; the
/// file itself is owned by the host application and may grow at any time.
#[derive(Debug, Clone)]
pub struct LogEngine {
    path: PathBuf,
    reader: TailReader,
    window: WindowFilter,
}

impl LogEngine {
    /// Creates an engine for `path`, reading timestamps as local time.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: TailReader::new(),
            window: WindowFilter::default(),
        }
    }

    /// Sets the zone the log's timestamps were written in.
    #[must_use]
    pub fn with_timezone(mut self, zone: LogTimezone) -> Self {
        self.window = WindowFilter::new(TimestampExtractor::new(zone));
        self
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probes the log file.
    #[must_use]
    pub fn stats(&self) -> LogFileStats {
        LogFileStats::probe(&self.path)
    }

    /// Checks the file exists and can be opened for reading.
    pub fn ensure_readable(&self) -> Result<()> {
        self.ensure_exists()?;
        File::open(&self.path)
            .map(drop)
            .map_err(|e| LogError::from_open(&self.path, FileAccess::Read, e))
    }

    /// Checks the file exists and can be opened for writing.
    pub fn ensure_writable(&self) -> Result<()> {
        self.ensure_exists()?;
        probe_writable(&self.path)
            .map(drop)
            .map_err(|e| LogError::from_open(&self.path, FileAccess::Write, e))
    }

    fn ensure_exists(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(()),
            Err(e) => Err(LogError::from_open(&self.path, FileAccess::Read, e)),
        }
    }

    /// Returns the last `requested` lines, clamped to `[1, max_allowed]`.
    pub fn tail_by_lines(&self, requested: usize, max_allowed: usize) -> Result<TailResult> {
        self.ensure_readable()?;
        let limit = requested.clamp(1, max_allowed.max(1));
        let lines = self.reader.read_last_lines(&self.path, limit)?;
        let count = lines.len();
        debug!(path = %self.path.display(), requested, limit, returned = count, "tail by lines");
        Ok(TailResult {
            mode: TailMode::Lines,
            lines,
            line_count_returned: count,
            lines_scanned: count,
            truncated_by_fallback: false,
            fell_back: false,
        })
    }

    /// Returns lines from the `minutes` minutes before `now` (epoch seconds).
    ///
    /// Only the last `max_lines_to_scan` lines are considered; older entries
    /// are never reached even if they fall inside the window.
    pub fn tail_by_minutes_at(
        &self,
        minutes: u32,
        max_lines_to_scan: usize,
        now: i64,
    ) -> Result<TailResult> {
        let minutes = minutes.max(1);
        let scan = self.tail_by_lines(max_lines_to_scan, max_lines_to_scan)?;
        let scanned = scan.lines.len();
        let threshold = now - i64::from(minutes) * 60;
        let outcome = self.window.filter(scan.lines, threshold);
        let count = outcome.kept.len();
        debug!(
            path = %self.path.display(),
            minutes,
            threshold,
            scanned,
            returned = count,
            any_unparseable = outcome.any_unparseable,
            fell_back = outcome.fell_back,
            "tail by minutes"
        );
        Ok(TailResult {
            mode: TailMode::Minutes,
            lines: outcome.kept,
            line_count_returned: count,
            lines_scanned: scanned,
            truncated_by_fallback: outcome.any_unparseable,
            fell_back: outcome.fell_back,
        })
    }

    /// Truncates the log file to zero length under an exclusive lock.
    ///
    /// The lock is taken without waiting; if another process holds it the
    /// file is left untouched and [`LogError::LockError`] is returned.
    pub fn clear(&self) -> Result<()> {
        self.ensure_writable()?;
        let file = probe_writable(&self.path)
            .map_err(|e| LogError::from_open(&self.path, FileAccess::Write, e))?;

        let guard = ExclusiveLock::try_acquire(&file, &self.path)?;
        let truncated = file.set_len(0).and_then(|()| file.sync_all());
        drop(guard);

        match truncated {
            Ok(()) => {
                info!(target: "dlv_audit", path = %self.path.display(), "log cleared");
                Ok(())
            }
            Err(source) => {
                warn!(path = %self.path.display(), error = %source, "log truncate failed");
                Err(LogError::TruncateError {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Reads the whole file if it is no larger than `max_bytes`.
    ///
    /// Reads exactly the size observed up front, so bytes appended during
    /// the read are not included.
    pub fn prepare_download(&self, max_bytes: u64) -> Result<DownloadPayload> {
        self.ensure_readable()?;
        let file = File::open(&self.path)
            .map_err(|e| LogError::from_open(&self.path, FileAccess::Read, e))?;
        let read_failed = |source: std::io::Error| LogError::ReadFailed {
            path: self.path.clone(),
            source,
        };

        let size = file.metadata().map_err(read_failed)?.len();
        if size > max_bytes {
            warn!(path = %self.path.display(), size, limit = max_bytes, "download refused");
            return Err(LogError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let mut bytes = Vec::with_capacity(size as usize);
        file.take(size)
            .read_to_end(&mut bytes)
            .map_err(read_failed)?;

        let filename = self
            .path
            .file_name()
            .map_or_else(|| DEFAULT_FILENAME.to_string(), |n| n.to_string_lossy().into_owned());
        info!(target: "dlv_audit", path = %self.path.display(), size = bytes.len(), "log downloaded");
        Ok(DownloadPayload {
            filename,
            size: bytes.len() as u64,
            bytes,
        })
    }
}

/// Advisory exclusive lock released when dropped.
struct ExclusiveLock<'a> {
    file: &'a File,
    path: &'a Path,
}

impl<'a> ExclusiveLock<'a> {
    fn try_acquire(file: &'a File, path: &'a Path) -> Result<Self> {
        FileExt::try_lock_exclusive(file).map_err(|source| {
            warn!(path = %path.display(), error = %source, "log lock unavailable");
            LogError::LockError {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), "log lock acquired");
        Ok(Self { file, path })
    }
}

impl Drop for ExclusiveLock<'_> {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release log lock");
        }
    }
}
