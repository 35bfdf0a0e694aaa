//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// debug-log-viewer: inspect, clear and download an application log.
#[derive(Parser, Debug, Clone)]
#[command(name = "dlv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log file to operate on.
    #[arg(short, long, env = "DLV_LOG_FILE", default_value = "debug.log")]
    pub log_file: PathBuf,

    /// Settings file (created on first write).
    #[arg(short, long, env = "DLV_SETTINGS", default_value = "dlv-settings.json")]
    pub settings: PathBuf,

    /// Deployment environment: production, staging, development, local or other.
    /// Unrecognized names are treated as production.
    #[arg(short, long, env = "DLV_ENVIRONMENT", default_value = "production")]
    pub environment: String,

    /// Zone the log's timestamps were written in.
    #[arg(long, value_enum, env = "DLV_TIMEZONE", default_value_t = Zone::Local)]
    pub timezone: Zone,

    /// Act as a sub-scope administrator.
    #[arg(long)]
    pub sub_scope: bool,

    /// Capabilities held by the caller (comma-separated: view, admin).
    #[arg(long, env = "DLV_CAPABILITIES", default_value = "view,admin")]
    pub capabilities: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable output.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Timestamp zone options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Zone {
    /// Host local time.
    #[default]
    Local,
    /// UTC.
    Utc,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the most recent lines or minutes of the log.
    Tail(TailArgs),

    /// Show log file attributes and current permissions.
    Stats,

    /// Truncate the log file.
    Clear,

    /// Copy the whole log (up to 5 MiB).
    Download {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enable or disable the 15-minute production override.
    Override {
        /// enable or disable.
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Enable or disable 15 minutes of temporary logging.
    TempLogging {
        /// enable or disable.
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Show or change viewer settings.
    Settings {
        /// Settings subcommand to execute.
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

/// Arguments for the tail command.
#[derive(Args, Debug, Clone, Default)]
pub struct TailArgs {
    /// Number of lines (defaults to the configured value).
    #[arg(short = 'n', long, conflicts_with = "minutes", allow_negative_numbers = true)]
    pub lines: Option<i64>,

    /// Minutes back from now (defaults to the configured value).
    #[arg(short, long, allow_negative_numbers = true)]
    pub minutes: Option<i64>,
}

/// Grant toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Start a fresh 15-minute window.
    Enable,
    /// End it now.
    Disable,
}

/// Settings subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Print the stored settings.
    Show,

    /// Set one setting.
    Set {
        /// Setting name, e.g. maxLines or max-lines.
        key: String,
        /// New value.
        value: String,
    },
}
