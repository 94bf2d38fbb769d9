//! Per-pair outcomes and the run summary.
//!
//! Every discovered log ends in exactly one `AlignmentOutcome`. The
//! `RunSummary` collects them in processing order together with counts per
//! category, and can be written out as JSON for downstream tooling.

use crate::error::CoreResult;
use crate::processing::plan::TranscodePlan;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Terminal state of one log's alignment attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlignmentOutcome {
    /// The video was rewritten to exactly `frames` frames at its canonical path.
    Aligned {
        output: PathBuf,
        frames: u64,
        rate_corrected: bool,
    },
    /// The companion is already at its canonical path with the right frame count.
    AlreadyAligned { path: PathBuf },
    /// Dry run: what would have been done.
    Planned { plan: TranscodePlan },
    SkippedNoMatch,
    SkippedTooShort { rows: u64 },
    SkippedUnreadable { path: PathBuf, reason: String },
    FailedVerification { expected: u64, actual: Option<u64> },
    FailedTranscode { reason: String },
}

impl AlignmentOutcome {
    /// True for outcomes that should make the run exit nonzero.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FailedVerification { .. } | Self::FailedTranscode { .. }
        )
    }

    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::SkippedNoMatch | Self::SkippedTooShort { .. } | Self::SkippedUnreadable { .. }
        )
    }
}

impl fmt::Display for AlignmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aligned {
                output,
                frames,
                rate_corrected,
            } => {
                write!(f, "aligned -> {} ({} frames", output.display(), frames)?;
                if *rate_corrected {
                    write!(f, ", rate corrected")?;
                }
                write!(f, ")")
            }
            Self::AlreadyAligned { path } => write!(f, "already aligned: {}", path.display()),
            Self::Planned { plan } => write!(
                f,
                "would transcode {} -> {} ({} frames, pad {:.3}s)",
                plan.source.display(),
                plan.target_path.display(),
                plan.target_frame_count,
                plan.padding_seconds
            ),
            Self::SkippedNoMatch => write!(f, "skipped: no companion video"),
            Self::SkippedTooShort { rows } => write!(f, "skipped: only {rows} rows"),
            Self::SkippedUnreadable { path, reason } => {
                write!(f, "skipped: {} unreadable ({})", path.display(), reason)
            }
            Self::FailedVerification { expected, actual } => match actual {
                Some(actual) => write!(
                    f,
                    "failed verification: expected {expected} frames, found {actual}"
                ),
                None => write!(
                    f,
                    "failed verification: expected {expected} frames, output unreadable"
                ),
            },
            Self::FailedTranscode { reason } => write!(f, "failed transcode: {reason}"),
        }
    }
}

/// One log and what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub log: PathBuf,
    pub outcome: AlignmentOutcome,
}

/// Totals and per-pair outcomes of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub aligned: usize,
    pub already_aligned: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pairs: Vec<PairReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outcome and updates the counts.
    pub fn record(&mut self, log: &Path, outcome: AlignmentOutcome) {
        match &outcome {
            AlignmentOutcome::Aligned { .. } => self.aligned += 1,
            AlignmentOutcome::AlreadyAligned { .. } => self.already_aligned += 1,
            AlignmentOutcome::Planned { .. } => self.planned += 1,
            o if o.is_failure() => self.failed += 1,
            _ => self.skipped += 1,
        }
        self.pairs.push(PairReport {
            log: log.to_path_buf(),
            outcome,
        });
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::debug!("Wrote run report to {}", path.display());
        Ok(())
    }
}
