// ============================================================================
// framesync-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for framesync-core
//
// This module defines the error taxonomy of the alignment engine. Most
// variants describe a per-pair failure that the pipeline converts into an
// `AlignmentOutcome` and moves past; only `ToolUnavailable` and the
// configuration/path errors stop a whole run.
//
// KEY COMPONENTS:
// - CoreError: Enum of every error the library can produce
// - CoreResult: Result alias used throughout the crate
// - Helper constructors for command-related errors

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;

/// Errors produced by the framesync core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Run-level errors ----
    /// ffmpeg or ffprobe could not be started or failed its `-version` check.
    #[error("Required tool '{tool}' is unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No sensor logs found under {0}")]
    NoLogsFound(PathBuf),

    // ---- Per-pair errors ----
    #[error("No companion video found for {0}")]
    NoCompanionFound(PathBuf),

    #[error("Log {path} has only {rows} rows (minimum {min})")]
    LogTooShort { path: PathBuf, rows: u64, min: u64 },

    #[error("Source video {0} reported no readable frames")]
    SourceUnreadable(PathBuf),

    #[error("Transcode of {source_path} failed: {stderr}")]
    TranscodeFailed { source_path: PathBuf, stderr: String },

    #[error("Frame count mismatch for {path}: expected {expected}, found {actual:?}")]
    VerificationMismatch {
        path: PathBuf,
        expected: u64,
        actual: Option<u64>,
    },

    #[error("Failed to {action} {path}: {source}")]
    CommitIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // ---- Plumbing ----
    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to read CSV log: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for framesync core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a `ToolUnavailable` error with a formatted reason.
pub fn tool_unavailable_error(tool: impl Into<String>, reason: impl Into<String>) -> CoreError {
    CoreError::ToolUnavailable {
        tool: tool.into(),
        reason: reason.into(),
    }
}

/// Creates a `CommitIo` error for a failed filesystem step during commit.
pub fn commit_io_error(
    action: &'static str,
    path: impl Into<PathBuf>,
    source: io::Error,
) -> CoreError {
    CoreError::CommitIo {
        action,
        path: path.into(),
        source,
    }
}
