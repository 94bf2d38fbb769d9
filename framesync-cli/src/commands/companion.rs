//! Implementation of the 'match' subcommand.
//!
//! Runs the same companion lookup as `align` for a single log and reports
//! the result. Nothing is probed or modified.

use crate::cli::MatchArgs;
use crate::commands::base_builder;
use crate::error::CliResult;
use crate::output;

use framesync_core::{CoreError, LogRecord, MatchResult, locate_companion};

/// Finds the companion video of one log.
///
/// Returns `CoreError::NoCompanionFound` when no strategy matches.
pub fn run_match(args: &MatchArgs) -> CliResult<MatchResult> {
    let log = LogRecord::load(&args.log)?;
    let config = base_builder(&args.config, log.dir.clone())?.build()?;

    let found = locate_companion(&log, &config)?;
    output::print_match(&log.path, log.rows, found.as_ref());

    found.ok_or(CoreError::NoCompanionFound(log.path))
}
