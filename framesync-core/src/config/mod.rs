//! Configuration structures and constants for the framesync-core library.
//!
//! This module provides the configuration system for the alignment engine:
//! output geometry and rate, matching conventions, drift thresholds and the
//! run-mode switches. Values come from defaults (optionally overridden by
//! `FRAMESYNC_*` environment variables), a TOML file, and finally whatever
//! the caller sets through [`CoreConfigBuilder`].

mod builder;
mod utils;

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use builder::CoreConfigBuilder;
use utils::{get_env_f64, get_env_path, get_env_string, get_env_u32, get_env_u64};

// Default constants

/// Frame rate every aligned video must exhibit.
pub const DEFAULT_TARGET_FPS: u32 = 20;

/// Output frame width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;

/// Output frame height in pixels.
pub const DEFAULT_HEIGHT: u32 = 480;

/// Video extensions eligible for matching, in the order they are tried.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 4] = ["avi", "mp4", "mov", "mkv"];

/// Extension of the canonical aligned video. Must suit the output codec.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "avi";

/// Intraframe codec used for the aligned output (frame-accurate seeking downstream).
pub const DEFAULT_VIDEO_CODEC: &str = "mjpeg";

/// `-q:v` value passed to the encoder. Lower is better quality.
pub const DEFAULT_VIDEO_QUALITY: u8 = 3;

/// Marker in log file names that maps to `DEFAULT_VIDEO_MARKER` in video names.
pub const DEFAULT_LOG_MARKER: &str = "data_";

/// Marker in video file names paired with `DEFAULT_LOG_MARKER`.
pub const DEFAULT_VIDEO_MARKER: &str = "video_";

/// Logs with fewer rows are skipped as too short to validate.
pub const DEFAULT_MIN_ROWS: u64 = 10;

/// Timestamp matches must be strictly closer than this many seconds.
pub const DEFAULT_MATCH_WINDOW_SECS: f64 = 60.0;

/// Absolute drift (seconds) that must be exceeded before correcting the rate.
pub const DEFAULT_DRIFT_ABS_THRESHOLD_SECS: f64 = 0.3;

/// Relative drift (fraction of expected duration) that must also be exceeded.
pub const DEFAULT_DRIFT_REL_THRESHOLD: f64 = 0.015;

/// Seconds of cloned tail frames always appended to the source.
pub const DEFAULT_PADDING_MARGIN_SECS: f64 = 2.0;

/// Main configuration structure for the framesync-core library.
///
/// All fields have defaults, so a configuration file only needs the keys it
/// wants to change.
///
/// # Examples
///
/// ```rust
/// use framesync_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .root_dir(PathBuf::from("/data/experiments"))
///     .target_fps(20)
///     .dry_run(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.target_fps, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Directory tree scanned for sensor logs
    pub root_dir: PathBuf,

    /// Output frame rate; one frame per CSV row at this rate
    pub target_fps: u32,

    /// Output frame width
    pub width: u32,

    /// Output frame height
    pub height: u32,

    /// Candidate video extensions (lowercase, without dot), in priority order
    pub video_extensions: Vec<String>,

    /// Extension of the committed output video
    pub output_extension: String,

    /// Encoder name passed to `-c:v`
    pub video_codec: String,

    /// Encoder quality passed to `-q:v`
    pub video_quality: u8,

    /// Directory holding the ffmpeg/ffprobe binaries; `PATH` is used when unset
    pub tool_dir: Option<PathBuf>,

    /// Marker in log stems replaced by `video_marker` for the first match rule
    pub log_marker: String,

    /// Replacement marker for video stems
    pub video_marker: String,

    /// Minimum number of data rows a log needs
    pub min_rows: u64,

    /// Timestamp proximity window in seconds (exclusive)
    pub match_window_secs: f64,

    /// Absolute drift threshold in seconds
    pub drift_abs_threshold_secs: f64,

    /// Relative drift threshold as a fraction of the expected duration
    pub drift_rel_threshold: f64,

    /// Minimum tail padding in seconds
    pub padding_margin_secs: f64,

    /// Plan every pair but never run the transcoder or touch files
    pub dry_run: bool,

    /// Re-transcode pairs that already look aligned
    pub force: bool,

    /// Remove leftover transient outputs from earlier runs before processing
    pub clean_stale: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            root_dir: get_env_path("FRAMESYNC_ROOT_DIR", PathBuf::from(".")),
            target_fps: get_env_u32("FRAMESYNC_TARGET_FPS", DEFAULT_TARGET_FPS),
            width: get_env_u32("FRAMESYNC_WIDTH", DEFAULT_WIDTH),
            height: get_env_u32("FRAMESYNC_HEIGHT", DEFAULT_HEIGHT),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            video_quality: DEFAULT_VIDEO_QUALITY,
            tool_dir: std::env::var_os("FRAMESYNC_TOOL_DIR").map(PathBuf::from),
            log_marker: get_env_string("FRAMESYNC_LOG_MARKER", DEFAULT_LOG_MARKER.to_string()),
            video_marker: get_env_string(
                "FRAMESYNC_VIDEO_MARKER",
                DEFAULT_VIDEO_MARKER.to_string(),
            ),
            min_rows: get_env_u64("FRAMESYNC_MIN_ROWS", DEFAULT_MIN_ROWS),
            match_window_secs: get_env_f64(
                "FRAMESYNC_MATCH_WINDOW_SECS",
                DEFAULT_MATCH_WINDOW_SECS,
            ),
            drift_abs_threshold_secs: DEFAULT_DRIFT_ABS_THRESHOLD_SECS,
            drift_rel_threshold: DEFAULT_DRIFT_REL_THRESHOLD,
            padding_margin_secs: DEFAULT_PADDING_MARGIN_SECS,
            dry_run: false,
            force: false,
            clean_stale: false,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with defaults for the given root directory.
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            ..Self::default()
        }
    }

    /// Loads a configuration from a TOML file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: CoreConfig = toml::from_str(&content)?;
        config.video_extensions = config
            .video_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        config.output_extension = normalize_extension(&config.output_extension);
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Expected duration in seconds of a log with `rows` samples.
    pub fn expected_duration(&self, rows: u64) -> f64 {
        rows as f64 / f64::from(self.target_fps)
    }

    /// Returns true if `ext` (with or without leading dot) is a configured video extension.
    pub fn is_video_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.video_extensions.iter().any(|known| *known == ext)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> CoreResult<()> {
        if self.target_fps == 0 {
            return Err(CoreError::Config("target_fps must be greater than 0".to_string()));
        }

        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Config(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        if self.video_extensions.is_empty() {
            return Err(CoreError::Config(
                "at least one video extension is required".to_string(),
            ));
        }

        if self.output_extension.is_empty() {
            return Err(CoreError::Config("output_extension must not be empty".to_string()));
        }

        if self.min_rows < 1 {
            return Err(CoreError::Config("min_rows must be at least 1".to_string()));
        }

        if !(self.padding_margin_secs.is_finite() && self.padding_margin_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "padding_margin_secs must be positive, got {}",
                self.padding_margin_secs
            )));
        }

        for (name, value) in [
            ("match_window_secs", self.match_window_secs),
            ("drift_abs_threshold_secs", self.drift_abs_threshold_secs),
            ("drift_rel_threshold", self.drift_rel_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Lowercases an extension and strips a leading dot (".MP4" -> "mp4").
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::new(PathBuf::from("/data"));
        assert!(config.validate().is_ok());
        assert_eq!(config.output_extension, "avi");
        assert_eq!(config.video_extensions, vec!["avi", "mp4", "mov", "mkv"]);
    }

    #[test]
    fn test_expected_duration() {
        let config = CoreConfig::default();
        assert!((config.expected_duration(150) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CoreConfig::default();
        config.target_fps = 0;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.video_extensions.clear();
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.drift_rel_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.padding_margin_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_video_extension_ignores_case_and_dot() {
        let config = CoreConfig::default();
        assert!(config.is_video_extension(".MP4"));
        assert!(config.is_video_extension("mkv"));
        assert!(!config.is_video_extension("csv"));
    }

    #[test]
    fn test_from_file_partial_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            r#"
root_dir = "/srv/sessions"
target_fps = 30
video_extensions = [".MP4", "avi"]
dry_run = true
"#
        )?;

        let config = CoreConfig::from_file(file.path())?;
        assert_eq!(config.root_dir, PathBuf::from("/srv/sessions"));
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.video_extensions, vec!["mp4", "avi"]);
        assert!(config.dry_run);
        assert_eq!(config.width, DEFAULT_WIDTH);
        Ok(())
    }

    #[test]
    fn test_from_file_rejects_malformed_toml() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "target_fps = \"fast\"")?;
        assert!(matches!(
            CoreConfig::from_file(file.path()),
            Err(CoreError::ConfigParse(_))
        ));
        Ok(())
    }
}
