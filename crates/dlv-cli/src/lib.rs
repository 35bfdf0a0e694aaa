//! # dlv-cli
//!
//! Command-line front end for debug-log-viewer.
//!
//! Every command builds a [`dlv_service::DebugLogService`] from the global
//! flags (log file, settings file, environment, capabilities) and runs one
//! operation against it. Output is a table or JSON.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, SettingsCommands, TailArgs, Toggle, Zone};
pub use commands::run;
pub use error::CliError;
pub use output::OutputFormat;
