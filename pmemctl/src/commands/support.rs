//! Support-dump engine.
//!
//! Replays the fixed diagnostic catalog through the command dispatcher
//! with the context output channel redirected into one destination file,
//! producing a linear transcript suitable for attaching to a support
//! request. Setup failures abort before any catalog entry runs; failures
//! inside an entry are recorded and the batch continues.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::catalog::SUPPORT_CATALOG;
use crate::cli::{self, OutputMode};
use crate::commands::Dispatcher;
use crate::context::CommandContext;
use crate::redirect;
use crate::status::CmdStatus;

/// Aggregate outcome of one support dump.
///
/// Once redirection was established, `status` is the status of the last
/// replayed entry; per-entry detail lives only in the transcript itself.
#[derive(Debug, Clone, Serialize)]
pub struct DumpResult {
    pub status: CmdStatus,
    pub message: String,
}

/// Run the full support dump into `destination`.
#[instrument(skip_all, fields(destination = destination.unwrap_or("")))]
pub fn run_dump(
    ctx: &CommandContext,
    dispatcher: &dyn Dispatcher,
    destination: Option<&str>,
) -> DumpResult {
    let Some(destination) = destination.filter(|dest| !dest.trim().is_empty()) else {
        return DumpResult {
            status: CmdStatus::InvalidArgument,
            message: "No destination provided for the support dump".to_string(),
        };
    };

    let redirection = match redirect::begin(ctx, Path::new(destination)) {
        Ok(guard) => guard,
        Err(err) => {
            warn!(err = %format!("{err:#}"), "could not open dump destination");
            return DumpResult {
                status: CmdStatus::ResourceError,
                message: format!("Could not open {destination} for writing"),
            };
        }
    };

    let status = run_catalog(ctx, dispatcher, &SUPPORT_CATALOG);
    drop(redirection);

    info!(status = ?status, destination, "support dump finished");
    DumpResult {
        status,
        message: format!("Dump successfully written to {destination}"),
    }
}

/// Replay `lines` in order, returning the status of the last entry.
///
/// Individual failures never stop the batch; callers needing per-entry
/// detail read the transcript.
pub fn run_catalog(
    ctx: &CommandContext,
    dispatcher: &dyn Dispatcher,
    lines: &[&str],
) -> CmdStatus {
    let mut last = CmdStatus::Success;
    for line in lines {
        last = run_step(ctx, dispatcher, line);
    }
    last
}

fn run_step(ctx: &CommandContext, dispatcher: &dyn Dispatcher, line: &str) -> CmdStatus {
    if let Err(err) = writeln!(ctx.out(), "/*\n* {line}\n*/") {
        warn!(err = %err, line, "write section header failed");
        return CmdStatus::ResourceError;
    }
    let command = match cli::parse_line(line) {
        Ok(command) => command,
        Err(err) => {
            debug!(err = %format!("{err:#}"), line, "catalog line failed to parse");
            return CmdStatus::InvalidArgument;
        }
    };
    match dispatcher.dispatch(ctx, &command) {
        Ok(()) => CmdStatus::Success,
        Err(err) => {
            warn!(err = %format!("{err:#}"), line, "catalog command failed");
            CmdStatus::Aborted
        }
    }
}

/// Print the dump result through the context output channel.
pub fn report(ctx: &CommandContext, result: &DumpResult) -> Result<()> {
    match ctx.output() {
        OutputMode::Json => {
            let payload =
                serde_json::to_string_pretty(result).context("serialize dump result")?;
            writeln!(ctx.out(), "{payload}")?;
        }
        OutputMode::Text => {
            writeln!(ctx.out(), "{}", result.message)?;
        }
    }
    Ok(())
}
