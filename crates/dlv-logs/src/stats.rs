//! Existence, size, mtime and permission probe for the log file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::{FileAccess, LogError};

/// Snapshot of the log file's observable attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFileStats {
    /// Display path of the log file.
    pub path: String,
    /// Whether the file exists.
    pub exists: bool,
    /// Whether the file can be opened for reading.
    pub readable: bool,
    /// Whether the file can be opened for writing.
    pub writable: bool,
    /// Size in bytes; reported as 0 unless the file is readable.
    pub size: u64,
    /// Size formatted with binary units.
    pub size_human: String,
    /// Last modification time in epoch seconds, when available.
    pub modified: Option<i64>,
    /// Remediation hints for anything that prevents normal use.
    pub errors: Vec<String>,
}

impl LogFileStats {
    /// Probes `path`. Never fails: problems are reported in `errors`.
    #[must_use]
    pub fn probe(path: &Path) -> Self {
        let mut stats = Self {
            path: path.display().to_string(),
            exists: false,
            readable: false,
            writable: false,
            size: 0,
            size_human: format_bytes(0),
            modified: None,
            errors: Vec::new(),
        };

        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                let err = LogError::from_open(path, FileAccess::Read, e);
                stats.errors.push(err.remediation().to_string());
                return stats;
            }
        };

        stats.exists = true;
        stats.readable = File::open(path).is_ok();
        stats.writable = probe_writable(path).is_ok();

        if stats.readable {
            stats.size = meta.len();
            stats.size_human = format_bytes(stats.size);
        } else {
            let err = LogError::PermissionDenied {
                path: path.to_path_buf(),
                access: FileAccess::Read,
            };
            stats.errors.push(err.remediation().to_string());
        }
        if !stats.writable {
            let err = LogError::PermissionDenied {
                path: path.to_path_buf(),
                access: FileAccess::Write,
            };
            stats.errors.push(err.remediation().to_string());
        }

        stats.modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);

        stats
    }
}

/// Opens for writing without creating or truncating.
pub(crate) fn probe_writable(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

/// Formats a byte count with binary units.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{} KiB", bytes / KIB)
    } else {
        format!("{bytes} B")
    }
}
