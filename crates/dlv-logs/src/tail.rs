//! Reading the last lines of a large, append-only file.
//!
//! [`TailReader`] seeks to the end of the file and walks backwards in fixed
//! size chunks, counting line boundaries until it has seen enough of them or
//! reached the start of the file. Only the bytes covering the requested lines
//! are ever held in memory.
//!
//! The file length is sampled once when the file is opened. Bytes appended
//! after that point are not part of the result, so a concurrent writer never
//! produces a torn read.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{FileAccess, LogError, Result};

/// Default backward read size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Reads the last lines of a text file without loading all of it.
#[derive(Debug, Clone, Copy)]
pub struct TailReader {
    chunk_size: usize,
}

impl Default for TailReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TailReader {
    /// Creates a reader using [`DEFAULT_CHUNK_SIZE`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a reader with a custom chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Returns the last `count` lines of `path`, oldest first.
    ///
    /// A final trailing newline terminates the last line rather than opening
    /// an empty one, and a `\r` before a newline is dropped. Invalid UTF-8 is
    /// replaced lossily. An empty file yields an empty vector.
    ///
    /// # Errors
    ///
    /// [`LogError::NotFound`] / [`LogError::PermissionDenied`] when the file
    /// cannot be opened, [`LogError::ReadFailed`] when a read fails part way
    /// (for example because the file was truncated or removed mid-read).
    pub fn read_last_lines(&self, path: &Path, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut file =
            File::open(path).map_err(|e| LogError::from_open(path, FileAccess::Read, e))?;
        let read_failed = |source: std::io::Error| LogError::ReadFailed {
            path: path.to_path_buf(),
            source,
        };

        let len = file.metadata().map_err(read_failed)?.len();
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut end = len;
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1)).map_err(read_failed)?;
        file.read_exact(&mut last).map_err(read_failed)?;
        if last[0] == b'\n' {
            end -= 1;
        }

        // Chunks are collected newest first and stitched together at the end.
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        let mut newlines = 0usize;
        let mut pos = end;
        while pos > 0 && newlines < count {
            let step = (self.chunk_size as u64).min(pos);
            pos -= step;
            let mut chunk = vec![0u8; step as usize];
            file.seek(SeekFrom::Start(pos)).map_err(read_failed)?;
            file.read_exact(&mut chunk).map_err(read_failed)?;
            newlines += memchr::memchr_iter(b'\n', &chunk).count();
            chunks.push(chunk);
        }

        let mut data = Vec::with_capacity(chunks.iter().map(Vec::len).sum());
        for chunk in chunks.iter().rev() {
            data.extend_from_slice(chunk);
        }

        let segments: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
        // When the scan stopped early, the first segment may be a partial line;
        // it is never among the last `count` segments in that case.
        let skip = segments.len().saturating_sub(count);
        let lines: Vec<String> = segments[skip..]
            .iter()
            .map(|&seg| {
                let seg = seg.strip_suffix(b"\r").unwrap_or(seg);
                String::from_utf8_lossy(seg).into_owned()
            })
            .collect();

        debug!(
            path = %path.display(),
            requested = count,
            returned = lines.len(),
            bytes_scanned = data.len(),
            "read tail"
        );
        Ok(lines)
    }
}
