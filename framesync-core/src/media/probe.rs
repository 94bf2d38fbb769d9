//! Stream inspection via ffprobe.
//!
//! ffprobe is asked to decode the first video stream and count its frames
//! (`-count_frames`), and to report the container duration, printed as bare
//! values one per line. Inspection never fails the run: if ffprobe cannot be
//! started or exits nonzero, the report is simply empty.

use crate::config::CoreConfig;
use crate::external::{CommandRunner, Tool};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What ffprobe could tell us about a video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StreamReport {
    /// Number of frames actually decoded from the first video stream
    pub frame_count: Option<u64>,
    /// Container duration in seconds
    pub duration: Option<f64>,
}

impl StreamReport {
    /// True when a positive frame count was reported.
    pub fn is_readable(&self) -> bool {
        matches!(self.frame_count, Some(n) if n > 0)
    }
}

/// Builds the ffprobe argument list for `path`.
pub fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-select_streams".to_string(),
        "v:0".to_string(),
        "-count_frames".to_string(),
        "-show_entries".to_string(),
        "stream=nb_read_frames:format=duration".to_string(),
        "-of".to_string(),
        "default=nokey=1:noprint_wrappers=1".to_string(),
        path.to_string_lossy().into_owned(),
    ]
}

/// Parses ffprobe's bare-value output.
///
/// A line of only ASCII digits is the frame count; any other line that
/// parses as a finite float is the duration. Everything else (`N/A`, blank
/// lines, warnings) is ignored.
pub fn parse_probe_output(text: &str) -> StreamReport {
    let mut report = StreamReport::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(frames) = line.parse::<u64>() {
                report.frame_count = Some(frames);
            }
        } else if let Ok(duration) = line.parse::<f64>() {
            if duration.is_finite() {
                report.duration = Some(duration);
            }
        }
    }

    report
}

/// Measures videos with ffprobe.
pub struct StreamInspector<'a, R: CommandRunner> {
    runner: &'a R,
    program: PathBuf,
}

impl<'a, R: CommandRunner> StreamInspector<'a, R> {
    /// Creates an inspector using the ffprobe located by `config.tool_dir`.
    pub fn new(runner: &'a R, config: &CoreConfig) -> Self {
        Self {
            runner,
            program: Tool::Ffprobe.resolve(config.tool_dir.as_deref()),
        }
    }

    /// Returns the frame count and duration of `path`.
    ///
    /// Both fields are `None` when ffprobe is missing or fails.
    pub fn inspect(&self, path: &Path) -> StreamReport {
        let output = match self.runner.run(&self.program, &probe_args(path)) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("ffprobe could not be run on {}: {}", path.display(), e);
                return StreamReport::default();
            }
        };

        if !output.success() {
            log::warn!(
                "ffprobe exited with {:?} for {}: {}",
                output.exit_code,
                path.display(),
                output.stderr.trim()
            );
            return StreamReport::default();
        }

        let report = parse_probe_output(&output.stdout);
        log::debug!(
            "Probed {}: frames={:?} duration={:?}",
            path.display(),
            report.frame_count,
            report.duration
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frames_and_duration() {
        let report = parse_probe_output("150\n7.400000\n");
        assert_eq!(report.frame_count, Some(150));
        assert_eq!(report.duration, Some(7.4));
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let report = parse_probe_output("N/A\n7.400000\n");
        assert_eq!(report.frame_count, None);
        assert_eq!(report.duration, Some(7.4));

        let report = parse_probe_output("150\nN/A\n");
        assert_eq!(report.frame_count, Some(150));
        assert_eq!(report.duration, None);

        assert_eq!(parse_probe_output(""), StreamReport::default());
    }

    #[test]
    fn test_parse_handles_crlf_and_whitespace() {
        let report = parse_probe_output("  200\r\n10.0 \r\n");
        assert_eq!(report.frame_count, Some(200));
        assert_eq!(report.duration, Some(10.0));
    }

    #[test]
    fn test_zero_frames_is_not_readable() {
        let report = parse_probe_output("0\n1.0\n");
        assert_eq!(report.frame_count, Some(0));
        assert!(!report.is_readable());
    }

    #[test]
    fn test_probe_args_end_with_path() {
        let args = probe_args(Path::new("/data/video_001.mp4"));
        assert_eq!(args.last().map(String::as_str), Some("/data/video_001.mp4"));
        assert!(args.iter().any(|a| a == "-count_frames"));
        assert!(args.iter().any(|a| a == "stream=nb_read_frames:format=duration"));
    }
}
