// ============================================================================
// framesync-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Logger Initialization for the CLI
//
// Console logging goes through `env_logger`, honouring RUST_LOG:
// - RUST_LOG=info (default): Per-pair progress and outcomes
// - RUST_LOG=debug / --verbose: Every external command and probe result
//
// With --log-dir, the core's log4rs setup is used instead so the same
// records also land in a timestamped file.

use framesync_core::file_logging::{log_file_path, setup_file_logging};
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Installs the global logger. Returns the log file path when file logging is on.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Option<PathBuf> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Some(dir) = log_dir {
        let path = log_file_path(dir, &get_timestamp());
        match setup_file_logging(&path, level) {
            Ok(()) => return Some(path),
            Err(e) => eprintln!(
                "Warning: could not set up file logging in {}: {}",
                dir.display(),
                e
            ),
        }
    }

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string().to_lowercase()),
    );
    if verbose {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(false);
    // Ignore the error if a logger is already installed (tests)
    let _ = builder.try_init();
    None
}
