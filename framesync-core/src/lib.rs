//! Core library for aligning sensor CSV logs with their companion videos.
//!
//! Each log under a root directory is paired with a video in the same
//! directory, the video's real frame count and duration are measured with
//! ffprobe, and ffmpeg rewrites it to exactly one frame per log row at the
//! target rate. The rewritten video replaces the original only after its
//! frame count has been verified.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framesync_core::{CoreConfig, SystemCommandRunner, run_alignment};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(PathBuf::from("/path/to/dataset"));
//! config.target_fps = 20;
//! config.validate().unwrap();
//!
//! let summary = run_alignment(&SystemCommandRunner, &config).unwrap();
//! println!("{} aligned, {} failed", summary.aligned, summary.failed);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod matching;
pub mod media;
pub mod processing;
pub mod reporting;
pub mod temp_files;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{LogRecord, find_log_files};
pub use error::{CoreError, CoreResult};
pub use external::{CommandOutput, CommandRunner, SystemCommandRunner, Tool, check_tools};
pub use matching::{MatchResult, MatchRule, VideoCandidate, find_companion, locate_companion};
pub use media::{StreamInspector, StreamReport};
pub use processing::{AlignContext, align_log, process_logs, run_alignment};
pub use reporting::{AlignmentOutcome, RunSummary};
pub use temp_files::remove_stale_artifacts;
