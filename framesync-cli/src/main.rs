// ============================================================================
// framesync-cli/src/main.rs
// ============================================================================
//
// FRAMESYNC CLI: Main Entry Point
//
// Parses arguments, installs the logger and dispatches to the command
// implementations in `commands`.
//
// EXIT CODES:
// - 0: Success (skipped pairs are not errors)
// - 1: The command could not run (missing tools, bad config, bad path)
// - 2: An alignment run finished but at least one pair failed

use clap::Parser;
use framesync_cli::error::{EXIT_ERROR, exit_code_for};
use framesync_cli::logging::init_logging;
use framesync_cli::{Cli, Commands, output, run_align, run_inspect, run_match};
use owo_colors::OwoColorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Some(path) = init_logging(cli.verbose, cli.log_dir.as_deref()) {
        log::info!("Logging to {}", path.display());
    }

    let result = match &cli.command {
        Commands::Align(args) => run_align(args).map(|summary| {
            output::print_summary(&summary);
            exit_code_for(&summary)
        }),
        Commands::Inspect(args) => run_inspect(args).map(|_| 0),
        Commands::Match(args) => run_match(args).map(|_| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(EXIT_ERROR);
        }
    }
}
