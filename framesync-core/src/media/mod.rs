//! Media probing module
//!
//! This module obtains the readable frame count and container duration of a
//! video using ffprobe, through the crate's `CommandRunner` abstraction.

pub mod probe;

// Re-export commonly used types
pub use probe::{StreamInspector, StreamReport, parse_probe_output, probe_args};
