//! Tail and stats commands.

use std::io::Write;

use dlv_service::TailQuery;

use super::Session;
use crate::cli::TailArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Prints the tail selected by `args`. Lines mode unless `--minutes` is given.
pub fn tail<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
    args: &TailArgs,
) -> Result<(), CliError> {
    let query = match (args.lines, args.minutes) {
        (_, Some(m)) => TailQuery::minutes(m),
        (Some(n), None) => TailQuery::lines(n),
        (None, None) => TailQuery::default(),
    };
    let response = session.service().get_tail(&session.request(), query)?;
    format.write(out, &response)
}

/// Prints file attributes and the access snapshot.
pub fn stats<W: Write>(
    session: &Session,
    out: &mut W,
    format: &OutputFormat,
) -> Result<(), CliError> {
    let response = session.service().get_stats(&session.request())?;
    format.write(out, &response)
}
