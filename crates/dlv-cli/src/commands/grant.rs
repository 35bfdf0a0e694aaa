//! Grant toggles.

use std::io::Write;

use dlv_access::GrantState;

use super::Session;
use crate::cli::Toggle;
use crate::error::CliError;
use crate::output::OutputFormat;

impl From<Toggle> for GrantState {
    fn from(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Enable => Self::Enable,
            Toggle::Disable => Self::Disable,
        }
    }
}

/// Enables or disables the production override.
pub fn production_override<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
    toggle: Toggle,
) -> Result<(), CliError> {
    let response = session
        .service()
        .set_production_override(&session.request(), toggle.into())?;
    format.write(out, &response)
}

/// Enables or disables temporary logging.
pub fn temp_logging<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
    toggle: Toggle,
) -> Result<(), CliError> {
    let response = session
        .service()
        .set_temp_logging(&session.request(), toggle.into())?;
    format.write(out, &response)
}
