// ============================================================================
// framesync-core/src/processing/pipeline.rs
// ============================================================================
//
// ALIGNMENT PIPELINE: Per-Log Orchestration
//
// This module drives one log from discovery to a terminal outcome, and a
// whole run from the dependency check to the summary.
//
// WORKFLOW (per log):
// 1. Load the log and count its rows
// 2. Reject logs shorter than min_rows, before anything else is looked at
// 3. Find the companion video in the log's directory
// 4. Measure the companion with ffprobe
// 5. Estimate drift
// 6. Stop early if the companion is already aligned
// 7. Plan the transcode (dry run stops here)
// 8. Transcode to a transient file
// 9. Verify and commit
//
// Per-pair errors never escape `align_log`; they become outcomes and the
// run moves on to the next log.
//
// AI-ASSISTANT-INFO: Alignment orchestration and run loop

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::discovery::{LogRecord, find_log_files};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::run_transcode;
use crate::external::{CommandRunner, check_tools};
use crate::matching::{MatchStrategy, default_strategies, find_companion, list_candidates};
use crate::media::StreamInspector;
use crate::processing::commit::commit;
use crate::processing::drift::estimate;
use crate::processing::plan::{canonical_target_path, plan};
use crate::reporting::{AlignmentOutcome, RunSummary};
use crate::temp_files;

// ---- External crate imports ----
use log::{error, info, warn};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything `align_log` needs besides the log path.
pub struct AlignContext<'a, R: CommandRunner> {
    pub runner: &'a R,
    pub config: &'a CoreConfig,
    pub strategies: Vec<Box<dyn MatchStrategy>>,
}

impl<'a, R: CommandRunner> AlignContext<'a, R> {
    /// Creates a context with the default matching strategies.
    pub fn new(runner: &'a R, config: &'a CoreConfig) -> Self {
        Self {
            runner,
            config,
            strategies: default_strategies(config),
        }
    }

    fn inspector(&self) -> StreamInspector<'a, R> {
        StreamInspector::new(self.runner, self.config)
    }
}

/// Maps a per-pair error to its outcome.
fn outcome_for_error(log_path: &Path, err: CoreError) -> AlignmentOutcome {
    match err {
        CoreError::NoCompanionFound(_) => AlignmentOutcome::SkippedNoMatch,
        CoreError::LogTooShort { rows, .. } => AlignmentOutcome::SkippedTooShort { rows },
        CoreError::SourceUnreadable(path) => AlignmentOutcome::SkippedUnreadable {
            path,
            reason: "no readable frames".to_string(),
        },
        CoreError::VerificationMismatch {
            expected, actual, ..
        } => AlignmentOutcome::FailedVerification { expected, actual },
        CoreError::TranscodeFailed { stderr, .. } => {
            AlignmentOutcome::FailedTranscode { reason: stderr }
        }
        e @ (CoreError::CommitIo { .. } | CoreError::CommandStart(..)) => {
            AlignmentOutcome::FailedTranscode {
                reason: e.to_string(),
            }
        }
        e => AlignmentOutcome::SkippedUnreadable {
            path: log_path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}

/// Steps 1-9 for one log, with per-pair errors as `Err`.
fn try_align<R: CommandRunner>(
    ctx: &AlignContext<'_, R>,
    log_path: &Path,
) -> CoreResult<AlignmentOutcome> {
    let config = ctx.config;

    let log = LogRecord::load(log_path)?;
    if log.rows < config.min_rows {
        return Err(CoreError::LogTooShort {
            path: log.path,
            rows: log.rows,
            min: config.min_rows,
        });
    }

    let candidates = list_candidates(&log.dir, config)?;
    let found = find_companion(&log, &candidates, &ctx.strategies)
        .ok_or_else(|| CoreError::NoCompanionFound(log.path.clone()))?;
    let candidate = found.candidate;
    info!(
        "{}: companion {} ({:?})",
        log.id,
        candidate.path.display(),
        found.rule
    );

    let inspector = ctx.inspector();
    let report = inspector.inspect(&candidate.path);
    if !report.is_readable() {
        return Err(CoreError::SourceUnreadable(candidate.path));
    }

    let assessment = estimate(&log, &report, config);

    let target_path = canonical_target_path(&candidate.path, config);
    if !config.force
        && candidate.path == target_path
        && report.frame_count == Some(log.rows)
        && !assessment.is_corrected()
    {
        return Ok(AlignmentOutcome::AlreadyAligned { path: target_path });
    }

    let plan = plan(&log, &candidate, &assessment, config);
    if config.dry_run {
        return Ok(AlignmentOutcome::Planned { plan });
    }

    if let Err(e) = run_transcode(ctx.runner, config, &plan) {
        temp_files::discard(&plan.output_path);
        return Err(e);
    }

    let output = commit(&inspector, &plan)?;
    Ok(AlignmentOutcome::Aligned {
        output,
        frames: plan.target_frame_count,
        rate_corrected: assessment.is_corrected(),
    })
}

/// Aligns one log with its companion video.
///
/// Never fails: every per-pair problem is reported as an outcome.
pub fn align_log<R: CommandRunner>(ctx: &AlignContext<'_, R>, log_path: &Path) -> AlignmentOutcome {
    try_align(ctx, log_path).unwrap_or_else(|e| outcome_for_error(log_path, e))
}

/// Aligns each log in turn, continuing past skips and failures.
pub fn process_logs<R: CommandRunner>(ctx: &AlignContext<'_, R>, logs: &[PathBuf]) -> RunSummary {
    let mut summary = RunSummary::new();
    let total = logs.len();

    for (index, log_path) in logs.iter().enumerate() {
        let started = Instant::now();
        info!("[{}/{}] {}", index + 1, total, log_path.display());

        let outcome = align_log(ctx, log_path);
        let elapsed = started.elapsed().as_secs_f64();
        if outcome.is_failure() {
            error!("{}: {} ({:.1}s)", log_path.display(), outcome, elapsed);
        } else if outcome.is_skip() {
            warn!("{}: {}", log_path.display(), outcome);
        } else {
            info!("{}: {} ({:.1}s)", log_path.display(), outcome, elapsed);
        }

        summary.record(log_path, outcome);
    }

    info!(
        "Run complete: {} aligned, {} already aligned, {} planned, {} skipped, {} failed",
        summary.aligned, summary.already_aligned, summary.planned, summary.skipped, summary.failed
    );
    summary
}

/// Runs a full alignment pass over `config.root_dir`.
///
/// # Returns
///
/// * `Ok(RunSummary)` - Outcomes for every discovered log
/// * `Err(CoreError::ToolUnavailable)` - ffmpeg or ffprobe missing; nothing was touched
/// * `Err(CoreError::Config | PathError | NoLogsFound)` - The run could not start
pub fn run_alignment<R: CommandRunner>(runner: &R, config: &CoreConfig) -> CoreResult<RunSummary> {
    config.validate()?;
    check_tools(runner, config)?;

    if config.clean_stale && config.dry_run {
        for stale in temp_files::find_stale_artifacts(&config.root_dir) {
            info!("Dry run: would remove stale {}", stale.display());
        }
    } else if config.clean_stale {
        let removed = temp_files::remove_stale_artifacts(&config.root_dir)?;
        if removed > 0 {
            info!("Removed {} stale transient file(s)", removed);
        }
    }

    let logs = find_log_files(&config.root_dir)?;
    info!("Found {} log(s) under {}", logs.len(), config.root_dir.display());
    if config.dry_run {
        info!("Dry run: no files will be modified");
    }

    let ctx = AlignContext::new(runner, config);
    Ok(process_logs(&ctx, &logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockCommandRunner;
    use std::fs;

    fn write_log(dir: &Path, name: &str, rows: usize) -> PathBuf {
        let mut content = String::from("t,value\n");
        for i in 0..rows {
            content.push_str(&format!("{i},0.5\n"));
        }
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_outcome_mapping() {
        let log = Path::new("/d/data_001.csv");
        assert_eq!(
            outcome_for_error(log, CoreError::NoCompanionFound(log.to_path_buf())),
            AlignmentOutcome::SkippedNoMatch
        );
        assert_eq!(
            outcome_for_error(
                log,
                CoreError::VerificationMismatch {
                    path: PathBuf::from("/d/tmp"),
                    expected: 150,
                    actual: Some(149)
                }
            ),
            AlignmentOutcome::FailedVerification {
                expected: 150,
                actual: Some(149)
            }
        );
        assert!(
            outcome_for_error(
                log,
                crate::error::commit_io_error(
                    "remove original",
                    "/d/video_001.mp4",
                    std::io::Error::other("denied")
                )
            )
            .is_failure()
        );
    }

    #[test]
    fn test_unreadable_source_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = write_log(dir.path(), "data_001.csv", 20);
        fs::write(dir.path().join("video_001.mp4"), b"")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("video_001.mp4", Some(0), Some(1.0));
        let config = CoreConfig::new(dir.path().to_path_buf());
        let ctx = AlignContext::new(&runner, &config);

        assert!(matches!(
            align_log(&ctx, &log),
            AlignmentOutcome::SkippedUnreadable { .. }
        ));
        assert!(runner.calls_to(crate::external::Tool::Ffmpeg).is_empty());
        Ok(())
    }

    #[test]
    fn test_dry_run_plans_without_touching_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = write_log(dir.path(), "data_001.csv", 150);
        fs::write(dir.path().join("video_001.mp4"), b"source")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("video_001.mp4", Some(150), Some(7.4));
        let mut config = CoreConfig::new(dir.path().to_path_buf());
        config.dry_run = true;
        let ctx = AlignContext::new(&runner, &config);

        match align_log(&ctx, &log) {
            AlignmentOutcome::Planned { plan } => {
                assert_eq!(plan.target_frame_count, 150);
                assert_eq!(plan.target_path, dir.path().join("video_001.avi"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(dir.path().join("video_001.mp4").exists());
        assert!(runner.calls_to(crate::external::Tool::Ffmpeg).is_empty());
        Ok(())
    }

    #[test]
    fn test_uppercase_output_extension_is_aligned() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = write_log(dir.path(), "data_001.csv", 150);
        fs::write(dir.path().join("video_001.AVI"), b"aligned")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("video_001.AVI", Some(150), Some(7.5));
        let config = CoreConfig::new(dir.path().to_path_buf());
        let ctx = AlignContext::new(&runner, &config);

        assert_eq!(
            align_log(&ctx, &log),
            AlignmentOutcome::AlreadyAligned {
                path: dir.path().join("video_001.AVI")
            }
        );
        assert_eq!(fs::read(dir.path().join("video_001.AVI"))?, b"aligned");
        assert!(runner.calls_to(crate::external::Tool::Ffmpeg).is_empty());
        Ok(())
    }

    #[test]
    fn test_forced_uppercase_source_survives_commit() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = write_log(dir.path(), "data_001.csv", 150);
        fs::write(dir.path().join("video_001.AVI"), b"original")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("video_001.AVI", Some(150), Some(7.5));
        runner.expect_transcode_success("video_001.AVI");
        runner.expect_probe("tmp_align_", Some(150), Some(7.5));
        let mut config = CoreConfig::new(dir.path().to_path_buf());
        config.force = true;
        let ctx = AlignContext::new(&runner, &config);

        match align_log(&ctx, &log) {
            AlignmentOutcome::Aligned { output, .. } => {
                assert_eq!(output, dir.path().join("video_001.AVI"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(fs::read(dir.path().join("video_001.AVI"))?, b"mock output");
        Ok(())
    }

    #[test]
    fn test_dry_run_keeps_stale_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        write_log(dir.path(), "data_001.csv", 150);
        fs::write(dir.path().join("video_001.mp4"), b"source")?;
        let stale = dir.path().join("tmp_align_data_001_4242.avi");
        fs::write(&stale, b"partial")?;

        let runner = MockCommandRunner::new().with_tools_available();
        runner.expect_probe("video_001.mp4", Some(150), Some(7.4));
        let mut config = CoreConfig::new(dir.path().to_path_buf());
        config.dry_run = true;
        config.clean_stale = true;

        let summary = run_alignment(&runner, &config)?;
        assert_eq!(summary.planned, 1);
        assert!(stale.exists());
        assert!(runner.calls_to(crate::external::Tool::Ffmpeg).is_empty());
        Ok(())
    }

    #[test]
    fn test_force_retranscodes_aligned_pair() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let log = write_log(dir.path(), "data_001.csv", 150);
        fs::write(dir.path().join("video_001.avi"), b"aligned")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("video_001.avi", Some(150), Some(7.5));
        runner.expect_transcode_success("video_001.avi");
        runner.expect_probe("tmp_align_", Some(150), Some(7.5));
        let mut config = CoreConfig::new(dir.path().to_path_buf());
        config.force = true;
        let ctx = AlignContext::new(&runner, &config);

        assert!(matches!(align_log(&ctx, &log), AlignmentOutcome::Aligned { .. }));
        assert!(dir.path().join("video_001.avi").exists());
        Ok(())
    }
}
