//! Transcode planning.
//!
//! Turns a matched pair and its drift assessment into the concrete
//! parameters of one transcoder invocation: how many frames to emit, at what
//! rate and size, how much trailing padding to allow so the frame cap is
//! always reachable, and where the output goes.

use crate::config::CoreConfig;
use crate::discovery::LogRecord;
use crate::matching::VideoCandidate;
use crate::processing::drift::DriftAssessment;
use crate::temp_files::transient_output_path;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything needed to produce and commit one aligned video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodePlan {
    /// Original companion video
    pub source: PathBuf,
    /// Exact number of frames the output must contain (`T`)
    pub target_frame_count: u64,
    pub target_rate: u32,
    pub width: u32,
    pub height: u32,
    /// Seconds of last-frame cloning appended before the frame cap
    pub padding_seconds: f64,
    /// Overrides the source's declared rate when drift was detected
    pub corrected_input_rate: Option<f64>,
    /// Transient output next to the log
    pub output_path: PathBuf,
    /// Canonical location of the aligned video
    pub target_path: PathBuf,
}

/// The canonical path of an aligned video: the source stem with the output
/// extension, in the source's directory.
///
/// A source whose extension differs from the output extension only by case
/// is already canonical.
pub fn canonical_target_path(source: &Path, config: &CoreConfig) -> PathBuf {
    let has_output_extension = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(&config.output_extension));
    if has_output_extension {
        return source.to_path_buf();
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}.{}", stem, config.output_extension);
    match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Padding rule:
///
/// - corrected rate: the margin alone, the stretched input already spans the log
/// - known positive duration: `max(margin, shortfall + margin)`
/// - otherwise: the whole expected span plus the margin
pub fn padding_seconds(assessment: &DriftAssessment, margin: f64) -> f64 {
    if assessment.is_corrected() {
        return margin;
    }
    match assessment.measured_duration {
        Some(d) if d > 0.0 => margin.max(assessment.expected_duration - d + margin),
        _ => assessment.expected_duration + margin,
    }
}

/// Builds the transcode plan for a log and its companion.
pub fn plan(
    log: &LogRecord,
    candidate: &VideoCandidate,
    assessment: &DriftAssessment,
    config: &CoreConfig,
) -> TranscodePlan {
    TranscodePlan {
        source: candidate.path.clone(),
        target_frame_count: log.rows,
        target_rate: config.target_fps,
        width: config.width,
        height: config.height,
        padding_seconds: padding_seconds(assessment, config.padding_margin_secs),
        corrected_input_rate: assessment.corrected_input_rate,
        output_path: transient_output_path(&log.dir, &log.id, &config.output_extension),
        target_path: canonical_target_path(&candidate.path, config),
    }
}
