//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dlv_access::{AccessSnapshot, Action, Reasons};
use dlv_config::Settings;
use dlv_service::{ClearResponse, GrantResponse, StatsResponse, TailResponse};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value in human-readable form.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for TailResponse {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        // Lines go out verbatim so the output can be piped.
        for line in &self.tail.lines {
            writeln!(writer, "{line}")?;
        }
        if self.tail.is_empty() {
            writeln!(writer, "(no lines)")?;
        }
        if self.tail.truncated_by_fallback {
            writeln!(
                writer,
                "(some lines have no timestamp; the time window was not fully applied)"
            )?;
        }
        Ok(())
    }
}

impl TableDisplay for StatsResponse {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let stats = &self.stats;
        writeln!(writer, "Log File")?;
        writeln!(writer, "{}", "─".repeat(40))?;
        writeln!(writer, "  Path:      {}", stats.path)?;
        writeln!(writer, "  Exists:    {}", yes_no(stats.exists))?;
        writeln!(writer, "  Readable:  {}", yes_no(stats.readable))?;
        writeln!(writer, "  Writable:  {}", yes_no(stats.writable))?;
        writeln!(writer, "  Size:      {}", stats.size_human)?;
        writeln!(
            writer,
            "  Modified:  {}",
            stats.modified.map_or_else(|| "-".to_string(), fmt_epoch)
        )?;
        for error in &stats.errors {
            writeln!(writer, "  ! {error}")?;
        }
        writeln!(writer)?;
        write_access(writer, &self.access)
    }
}

impl TableDisplay for AccessSnapshot {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write_access(writer, self)
    }
}

impl TableDisplay for ClearResponse {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Log cleared at {}", self.cleared_at)?;
        Ok(())
    }
}

impl TableDisplay for GrantResponse {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.message)?;
        if self.expires_at > 0 {
            writeln!(writer, "Expires: {}", fmt_epoch(self.expires_at))?;
        }
        Ok(())
    }
}

impl TableDisplay for Settings {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Settings")?;
        writeln!(writer, "{}", "─".repeat(40))?;
        writeln!(writer, "  defaultLines:                {}", self.default_lines)?;
        writeln!(writer, "  defaultMinutes:              {}", self.default_minutes)?;
        writeln!(writer, "  maxLines:                    {}", self.max_lines)?;
        writeln!(
            writer,
            "  autoRefreshIntervalSeconds:  {}",
            self.auto_refresh_interval_seconds
        )?;
        writeln!(writer, "  downloadEnabled:             {}", self.download_enabled)?;
        writeln!(writer, "  allowSubScopeActions:        {}", self.allow_sub_scope_actions)?;
        writeln!(writer, "  logWritesEnabled:            {}", self.log_writes_enabled)?;
        Ok(())
    }
}

/// Result of a download written to a file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSummary {
    /// Suggested attachment name.
    pub filename: String,
    /// Where the bytes were written.
    pub output: PathBuf,
    /// Bytes written.
    pub size: u64,
}

impl TableDisplay for DownloadSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "Saved {} ({} bytes) to {}",
            self.filename,
            self.size,
            self.output.display()
        )?;
        Ok(())
    }
}

fn write_access<W: Write>(writer: &mut W, access: &AccessSnapshot) -> Result<(), CliError> {
    writeln!(writer, "Access")?;
    writeln!(writer, "{}", "─".repeat(40))?;
    writeln!(writer, "  Environment:     {}", access.environment)?;
    writeln!(
        writer,
        "  Override:        {}",
        grant_state(access.override_active, access.override_expires_at)
    )?;
    writeln!(
        writer,
        "  Temp logging:    {}",
        grant_state(access.temp_logging_active, access.temp_logging_expires_at)
    )?;
    writeln!(writer, "  Logging:         {}", on_off(access.logging_effective))?;
    writeln!(
        writer,
        "  Clear:           {}",
        permit(access.can_clear, &access.reasons.clear, Action::Clear)
    )?;
    writeln!(
        writer,
        "  Download:        {}",
        permit(access.can_download, &access.reasons.download, Action::Download)
    )?;
    Ok(())
}

fn permit(allowed: bool, reasons: &Reasons, action: Action) -> String {
    match reasons.primary() {
        Some(reason) if !allowed => format!("denied ({})", reason.message(action)),
        _ => "allowed".to_string(),
    }
}

fn grant_state(active: bool, expires_at: i64) -> String {
    if active {
        format!("active until {}", fmt_epoch(expires_at))
    } else {
        "inactive".to_string()
    }
}

fn fmt_epoch(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map_or_else(|| epoch.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
