//! Clear and download commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use super::Session;
use crate::error::CliError;
use crate::output::{DownloadSummary, OutputFormat};

/// Truncates the log.
pub fn clear<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
) -> Result<(), CliError> {
    let response = session.service().clear_log(&session.request())?;
    format.write(out, &response)
}

/// Writes the log to `output`, or raw to `out` when no path is given.
pub fn download<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let payload = session.service().download_log(&session.request())?;

    let Some(path) = output else {
        out.write_all(&payload.bytes)?;
        out.flush()?;
        return Ok(());
    };

    fs::write(path, &payload.bytes)?;
    info!(output = %path.display(), size = payload.size, "download saved");
    format.write(
        out,
        &DownloadSummary {
            filename: payload.filename,
            output: path.to_path_buf(),
            size: payload.size,
        },
    )
}
