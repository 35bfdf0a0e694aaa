//! Settings commands.

use std::io::Write;

use dlv_config::SettingKey;

use super::Session;
use crate::cli::SettingsCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Shows or updates settings.
pub fn execute<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
    command: &SettingsCommands,
) -> Result<(), CliError> {
    let req = session.request();
    let settings = match command {
        SettingsCommands::Show => session.service().settings(&req)?,
        SettingsCommands::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            session.service().update_setting(&req, key, value)?
        }
    };
    format.write(out, &settings)
}
