//! Drift estimation.
//!
//! A log with `T` rows sampled at the target rate covers `T / fps` seconds.
//! When the companion video's container duration falls noticeably short of
//! that, the camera most likely recorded at a lower rate than its header
//! claims, and the input rate is overridden so the decoded frames spread
//! across the log's span.

use crate::config::CoreConfig;
use crate::discovery::LogRecord;
use crate::media::StreamReport;

use serde::Serialize;

/// Result of comparing a log's expected span with its video's duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftAssessment {
    pub measured_frame_count: u64,
    /// Container duration, if ffprobe reported a positive one
    pub measured_duration: Option<f64>,
    /// `T / target_fps`
    pub expected_duration: f64,
    /// `expected - measured`; positive when the video is short
    pub drift_seconds: Option<f64>,
    /// `drift / expected`
    pub drift_ratio: Option<f64>,
    /// Input rate to force on the decoder, set only when both thresholds are exceeded
    pub corrected_input_rate: Option<f64>,
}

impl DriftAssessment {
    pub fn is_corrected(&self) -> bool {
        self.corrected_input_rate.is_some()
    }
}

/// Compares the log's expected duration with the measured stream.
///
/// Correction applies iff `drift > drift_abs_threshold_secs` and
/// `ratio > drift_rel_threshold`; the corrected rate is
/// `measured_frame_count / expected`. A video longer than expected is never
/// corrected.
pub fn estimate(log: &LogRecord, report: &StreamReport, config: &CoreConfig) -> DriftAssessment {
    let measured_frame_count = report.frame_count.unwrap_or(0);
    let expected_duration = config.expected_duration(log.rows);

    // ffprobe reports 0 for broken containers; only a positive duration counts
    let measured_duration = report.duration.filter(|d| *d > 0.0);

    let (drift_seconds, drift_ratio) = match measured_duration {
        Some(measured) => {
            let drift = expected_duration - measured;
            (Some(drift), Some(drift / expected_duration.max(1e-6)))
        }
        None => (None, None),
    };

    let corrected_input_rate = match (drift_seconds, drift_ratio) {
        (Some(drift), Some(ratio))
            if drift > config.drift_abs_threshold_secs
                && ratio > config.drift_rel_threshold
                && measured_frame_count > 0 =>
        {
            Some(measured_frame_count as f64 / expected_duration)
        }
        _ => None,
    };

    if let Some(rate) = corrected_input_rate {
        log::info!(
            "{}: video is {:.3}s short of the log, forcing input rate {:.6} fps",
            log.id,
            drift_seconds.unwrap_or_default(),
            rate
        );
    }

    DriftAssessment {
        measured_frame_count,
        measured_duration,
        expected_duration,
        drift_seconds,
        drift_ratio,
        corrected_input_rate,
    }
}
