//! CLI command implementations.
//!
//! - [`view`]: tail and stats
//! - [`maintenance`]: clear and download
//! - [`grant`]: production override and temporary logging
//! - [`settings`]: show and set settings

pub mod grant;
pub mod maintenance;
pub mod settings;
pub mod view;

use std::io::Write;
use std::sync::Arc;

use dlv_access::{EnvironmentKind, StaticCapabilities, SystemClock};
use dlv_config::JsonSettingsStore;
use dlv_logs::{LogEngine, LogTimezone};
use dlv_service::{DebugLogService, RequestContext};
use tracing::debug;

use crate::cli::{Cli, Commands, Zone};
use crate::error::CliError;
use crate::output::OutputFormat;

/// Service and caller identity built from global flags.
pub struct Session {
    service: DebugLogService,
    capabilities: StaticCapabilities,
    sub_scope: bool,
}

impl Session {
    /// Builds a session from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let zone = match cli.timezone {
            Zone::Local => LogTimezone::Local,
            Zone::Utc => LogTimezone::Utc,
        };
        let environment = match cli.environment.parse::<EnvironmentKind>() {
            Ok(kind) => kind,
            Err(never) => match never {},
        };
        let capabilities = StaticCapabilities::parse_list(&cli.capabilities)?;
        debug!(
            log_file = %cli.log_file.display(),
            settings = %cli.settings.display(),
            %environment,
            "session configured"
        );

        let service = DebugLogService::new(
            LogEngine::new(&cli.log_file).with_timezone(zone),
            Arc::new(JsonSettingsStore::new(&cli.settings)),
            Arc::new(SystemClock),
            environment,
        );
        Ok(Self {
            service,
            capabilities,
            sub_scope: cli.sub_scope,
        })
    }

    /// The request context for this caller.
    #[must_use]
    pub fn request(&self) -> RequestContext<'_> {
        RequestContext::new(&self.capabilities).in_sub_scope(self.sub_scope)
    }

    /// The service.
    #[must_use]
    pub const fn service(&self) -> &DebugLogService {
        &self.service
    }
}

/// Runs the parsed command, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let session = Session::from_cli(cli)?;
    let format = OutputFormat::new(cli.format);

    match &cli.command {
        Commands::Tail(args) => view::tail(&session, out, &format, args),
        Commands::Stats => view::stats(&session, out, &format),
        Commands::Clear => maintenance::clear(&session, out, &format),
        Commands::Download { output } => {
            maintenance::download(&session, out, &format, output.as_deref())
        }
        Commands::Override { state } => grant::production_override(&session, out, &format, *state),
        Commands::TempLogging { state } => grant::temp_logging(&session, out, &format, *state),
        Commands::Settings { command } => settings::execute(&session, out, &format, command),
    }
}
