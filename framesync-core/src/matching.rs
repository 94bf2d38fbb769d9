// ============================================================================
// framesync-core/src/matching.rs
// ============================================================================
//
// COMPANION MATCHING: Pairing Sensor Logs with Their Videos
//
// Field-collected datasets name their files inconsistently, so a log's video
// is located by an ordered list of strategies, strict first and fuzzy last:
//
// 1. PrefixSubstitutionMatcher - "data_001" -> "video_001", any extension
// 2. ExactStemMatcher          - "data_001" -> "data_001", any extension
// 3. TimestampProximityMatcher - nearest YYYYMMDD_HHMMSS token within the window
//
// Matching is a pure function over an explicit candidate list. Only the
// enumeration of that list (`list_candidates`) touches the filesystem, and it
// only looks at the log's own directory.
//
// AI-ASSISTANT-INFO: Companion video matching strategies

// ---- Internal crate imports ----
use crate::config::{CoreConfig, normalize_extension};
use crate::discovery::LogRecord;
use crate::error::CoreResult;
use crate::temp_files::is_transient_artifact;

// ---- External crate imports ----
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Date token, `-` or `_`, then time token, anywhere in a file name.
static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{8})[-_](\d{6})").expect("timestamp pattern is valid"));

/// Extracts the `YYYYMMDD[-_]HHMMSS` timestamp from a file name.
///
/// Returns `None` if no token is present or the digits do not form a valid
/// date and time (e.g. month 13).
pub fn extract_timestamp(name: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(name)?;
    let joined = format!("{}{}", &caps[1], &caps[2]);
    NaiveDateTime::parse_from_str(&joined, "%Y%m%d%H%M%S").ok()
}

// ============================================================================
// DATA TYPES
// ============================================================================

/// A video file that might belong to a log.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCandidate {
    /// File stem, e.g. `video_001`
    pub id: String,
    /// Full path to the video
    pub path: PathBuf,
    /// Timestamp parsed from the file name, if any
    pub timestamp: Option<NaiveDateTime>,
    /// Lowercased extension without dot
    pub extension: String,
}

impl VideoCandidate {
    /// Builds a candidate from a path, or `None` if the extension is not a
    /// configured video extension or the file is a transient artifact.
    pub fn from_path(path: &Path, config: &CoreConfig) -> Option<Self> {
        if is_transient_artifact(path) {
            return None;
        }
        let extension = normalize_extension(path.extension()?.to_str()?);
        if !config.is_video_extension(&extension) {
            return None;
        }
        let id = path.file_stem()?.to_string_lossy().into_owned();
        let timestamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(extract_timestamp);

        Some(Self {
            id,
            path: path.to_path_buf(),
            timestamp,
            extension,
        })
    }
}

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchRule {
    PrefixSubstitution,
    ExactStem,
    TimestampProximity { delta_secs: f64 },
}

/// A log's chosen companion.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub candidate: VideoCandidate,
    pub rule: MatchRule,
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// One companion-matching rule.
pub trait MatchStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the matching candidate, or `None` to defer to the next strategy.
    fn try_match(&self, log: &LogRecord, candidates: &[VideoCandidate]) -> Option<MatchResult>;
}

/// Finds a candidate with exactly `stem`, trying extensions in priority order.
fn find_by_stem(
    stem: &str,
    extensions: &[String],
    candidates: &[VideoCandidate],
) -> Option<VideoCandidate> {
    extensions.iter().find_map(|ext| {
        candidates
            .iter()
            .find(|c| c.id == stem && c.extension == *ext && !is_transient_artifact(&c.path))
            .cloned()
    })
}

/// Rule 1: replace the log marker with the video marker in the stem.
#[derive(Debug, Clone)]
pub struct PrefixSubstitutionMatcher {
    pub log_marker: String,
    pub video_marker: String,
    pub extensions: Vec<String>,
}

impl MatchStrategy for PrefixSubstitutionMatcher {
    fn name(&self) -> &'static str {
        "prefix-substitution"
    }

    fn try_match(&self, log: &LogRecord, candidates: &[VideoCandidate]) -> Option<MatchResult> {
        if self.log_marker.is_empty() {
            return None;
        }
        let stem = log.id.replace(&self.log_marker, &self.video_marker);
        if stem == log.id {
            return None;
        }
        find_by_stem(&stem, &self.extensions, candidates).map(|candidate| MatchResult {
            candidate,
            rule: MatchRule::PrefixSubstitution,
        })
    }
}

/// Rule 2: a video with the same stem as the log.
#[derive(Debug, Clone)]
pub struct ExactStemMatcher {
    pub extensions: Vec<String>,
}

impl MatchStrategy for ExactStemMatcher {
    fn name(&self) -> &'static str {
        "exact-stem"
    }

    fn try_match(&self, log: &LogRecord, candidates: &[VideoCandidate]) -> Option<MatchResult> {
        find_by_stem(&log.id, &self.extensions, candidates).map(|candidate| MatchResult {
            candidate,
            rule: MatchRule::ExactStem,
        })
    }
}

/// Rule 3: the candidate whose file-name timestamp is nearest the log's.
#[derive(Debug, Clone)]
pub struct TimestampProximityMatcher {
    /// Matches must be strictly closer than this many seconds
    pub window_secs: f64,
}

impl MatchStrategy for TimestampProximityMatcher {
    fn name(&self) -> &'static str {
        "timestamp-proximity"
    }

    fn try_match(&self, log: &LogRecord, candidates: &[VideoCandidate]) -> Option<MatchResult> {
        let log_name = log.path.file_name()?.to_str()?;
        let log_ts = extract_timestamp(log_name)?;

        let mut best: Option<(&VideoCandidate, f64)> = None;
        for candidate in candidates {
            if is_transient_artifact(&candidate.path) {
                continue;
            }
            let Some(ts) = candidate.timestamp else {
                continue;
            };
            let delta = (ts - log_ts).num_milliseconds().abs() as f64 / 1000.0;
            if delta >= self.window_secs {
                continue;
            }
            if best.is_none_or(|(_, best_delta)| delta < best_delta) {
                best = Some((candidate, delta));
            }
        }

        best.map(|(candidate, delta_secs)| MatchResult {
            candidate: candidate.clone(),
            rule: MatchRule::TimestampProximity { delta_secs },
        })
    }
}

/// The standard strategy order for a configuration.
pub fn default_strategies(config: &CoreConfig) -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(PrefixSubstitutionMatcher {
            log_marker: config.log_marker.clone(),
            video_marker: config.video_marker.clone(),
            extensions: config.video_extensions.clone(),
        }),
        Box::new(ExactStemMatcher {
            extensions: config.video_extensions.clone(),
        }),
        Box::new(TimestampProximityMatcher {
            window_secs: config.match_window_secs,
        }),
    ]
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Runs `strategies` in order and returns the first match.
pub fn find_companion(
    log: &LogRecord,
    candidates: &[VideoCandidate],
    strategies: &[Box<dyn MatchStrategy>],
) -> Option<MatchResult> {
    strategies.iter().find_map(|strategy| {
        let result = strategy.try_match(log, candidates);
        if let Some(found) = &result {
            log::debug!(
                "{}: matched {} by {}",
                log.id,
                found.candidate.path.display(),
                strategy.name()
            );
        }
        result
    })
}

/// Lists the candidates next to `log` and applies the default strategies.
pub fn locate_companion(log: &LogRecord, config: &CoreConfig) -> CoreResult<Option<MatchResult>> {
    let candidates = list_candidates(&log.dir, config)?;
    Ok(find_companion(log, &candidates, &default_strategies(config)))
}

/// Enumerates the video candidates in `dir`, sorted by file name.
///
/// Subdirectories, non-video files and transient artifacts are excluded.
pub fn list_candidates(dir: &Path, config: &CoreConfig) -> CoreResult<Vec<VideoCandidate>> {
    let mut candidates: Vec<VideoCandidate> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| VideoCandidate::from_path(&path, config))
        .collect();
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(candidates)
}
