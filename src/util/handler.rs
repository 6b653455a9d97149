use std::io::Write;

use anyhow::Result;
use tracing::{Level, event};

use crate::core::common::LoggingOptions;
use crate::core::konst::APP_NAME;
use crate::lookup::outcome::LookupOutcome;
use crate::util::message::{outcome_msg, unsupported_msg};

/// Print an outcome to the terminal unless quiet.
/// The structured event is emitted by the worker.
pub fn outcome_handler(outcome: &LookupOutcome, logging_options: &LoggingOptions) {
    if !logging_options.quiet {
        eprintln!("{}", outcome_msg(outcome));
    }
}

pub fn unsupported_handler(token: &str, logging_options: &LoggingOptions) {
    let msg = unsupported_msg(token);
    if !logging_options.quiet {
        eprintln!("{msg}");
    }
    event!(target: APP_NAME, Level::DEBUG, "{msg}");
}

/// Write a terminal status line (header, notices, summary) unless quiet.
pub fn status_handler<W: Write>(out: &mut W, msg: &str, logging_options: &LoggingOptions) -> Result<()> {
    if !logging_options.quiet {
        writeln!(out, "{msg}")?;
    }
    Ok(())
}
