// ============================================================================
// framesync-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for layering CLI overrides on top of defaults or a
// loaded configuration file. `build` validates the result.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, normalize_extension};
use crate::error::CoreResult;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use framesync_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .root_dir(PathBuf::from("/data/experiments"))
///     .target_fps(25)
///     .video_extensions(vec![".mp4".to_string(), "mov".to_string()])
///     .build()
///     .unwrap();
/// assert_eq!(config.video_extensions, vec!["mp4", "mov"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new builder seeded with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with an existing configuration (e.g. one
    /// loaded from a file).
    pub fn from_config(config: CoreConfig) -> Self {
        Self { config }
    }

    /// Sets the directory tree scanned for logs.
    pub fn root_dir(mut self, root_dir: PathBuf) -> Self {
        self.config.root_dir = root_dir;
        self
    }

    /// Sets the output frame rate.
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.config.target_fps = fps;
        self
    }

    /// Sets the output frame size.
    pub fn frame_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Replaces the candidate video extensions. Order is match priority.
    pub fn video_extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.video_extensions = extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        self
    }

    /// Sets the directory containing ffmpeg and ffprobe.
    pub fn tool_dir(mut self, dir: PathBuf) -> Self {
        self.config.tool_dir = Some(dir);
        self
    }

    /// Sets the log/video stem markers used by the substitution rule.
    pub fn markers(mut self, log_marker: &str, video_marker: &str) -> Self {
        self.config.log_marker = log_marker.to_string();
        self.config.video_marker = video_marker.to_string();
        self
    }

    /// Sets the minimum row count.
    pub fn min_rows(mut self, rows: u64) -> Self {
        self.config.min_rows = rows;
        self
    }

    /// Sets the absolute and relative drift thresholds.
    pub fn drift_thresholds(mut self, abs_secs: f64, rel: f64) -> Self {
        self.config.drift_abs_threshold_secs = abs_secs;
        self.config.drift_rel_threshold = rel;
        self
    }

    /// Enables plan-only mode.
    pub fn dry_run(mut self, enable: bool) -> Self {
        self.config.dry_run = enable;
        self
    }

    /// Re-transcode pairs that are already aligned.
    pub fn force(mut self, enable: bool) -> Self {
        self.config.force = enable;
        self
    }

    /// Removes stale transient outputs before processing.
    pub fn clean_stale(mut self, enable: bool) -> Self {
        self.config.clean_stale = enable;
        self
    }

    /// The values set so far, not yet validated.
    pub fn current(&self) -> &CoreConfig {
        &self.config
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<CoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
