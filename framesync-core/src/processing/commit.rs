//! Verification and commit of a transcoded output.
//!
//! The transient output is re-measured before anything else is touched. Only
//! an output with exactly `T` frames replaces the original, and the original
//! is deleted only once the replacement is confirmed at the canonical path.

use crate::error::{CoreError, CoreResult, commit_io_error};
use crate::external::CommandRunner;
use crate::media::StreamInspector;
use crate::processing::plan::TranscodePlan;
use crate::temp_files;

use std::fs;
use std::io;
use std::path::PathBuf;

/// Verifies `plan.output_path` and moves it to `plan.target_path`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonical path now holding the aligned video
/// * `Err(CoreError::VerificationMismatch)` - Frame count differs from `T`;
///   the transient output has been removed and the source is untouched
/// * `Err(CoreError::CommitIo)` - A filesystem step failed
pub fn commit<R: CommandRunner>(
    inspector: &StreamInspector<'_, R>,
    plan: &TranscodePlan,
) -> CoreResult<PathBuf> {
    let report = inspector.inspect(&plan.output_path);
    if report.frame_count != Some(plan.target_frame_count) {
        temp_files::discard(&plan.output_path);
        return Err(CoreError::VerificationMismatch {
            path: plan.output_path.clone(),
            expected: plan.target_frame_count,
            actual: report.frame_count,
        });
    }
    log::debug!(
        "Verified {} frames in {}",
        plan.target_frame_count,
        plan.output_path.display()
    );

    // Decided before the rename: afterwards an aliased source resolves to the new file
    let source_is_target = plan.source == plan.target_path
        || same_file::is_same_file(&plan.source, &plan.target_path).unwrap_or(false);

    // rename replaces an existing target on both Unix and Windows
    if let Err(e) = fs::rename(&plan.output_path, &plan.target_path) {
        temp_files::discard(&plan.output_path);
        return Err(commit_io_error("move output to", &plan.target_path, e));
    }

    if !plan.target_path.is_file() {
        return Err(commit_io_error(
            "confirm",
            &plan.target_path,
            io::Error::new(io::ErrorKind::NotFound, "target missing after rename"),
        ));
    }

    if !source_is_target {
        fs::remove_file(&plan.source)
            .map_err(|e| commit_io_error("remove original", &plan.source, e))?;
        log::debug!("Removed original {}", plan.source.display());
    }

    Ok(plan.target_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::external::mocks::MockCommandRunner;

    fn plan_in(dir: &std::path::Path, source: &str, target: &str) -> TranscodePlan {
        TranscodePlan {
            source: dir.join(source),
            target_frame_count: 200,
            target_rate: 20,
            width: 640,
            height: 480,
            padding_seconds: 2.0,
            corrected_input_rate: None,
            output_path: dir.join("tmp_align_data_001_1.avi"),
            target_path: dir.join(target),
        }
    }

    #[test]
    fn test_commit_replaces_and_removes_original() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let plan = plan_in(dir.path(), "video_001.mp4", "video_001.avi");
        fs::write(&plan.source, b"original")?;
        fs::write(&plan.output_path, b"aligned")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("tmp_align_", Some(200), Some(10.0));
        let config = CoreConfig::default();
        let inspector = StreamInspector::new(&runner, &config);

        let committed = commit(&inspector, &plan)?;
        assert_eq!(committed, plan.target_path);
        assert_eq!(fs::read(&plan.target_path)?, b"aligned");
        assert!(!plan.source.exists());
        assert!(!plan.output_path.exists());
        Ok(())
    }

    #[test]
    fn test_commit_over_same_path_keeps_target() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let plan = plan_in(dir.path(), "video_001.avi", "video_001.avi");
        fs::write(&plan.source, b"original")?;
        fs::write(&plan.output_path, b"aligned")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("tmp_align_", Some(200), Some(10.0));
        let config = CoreConfig::default();
        let inspector = StreamInspector::new(&runner, &config);

        commit(&inspector, &plan)?;
        assert_eq!(fs::read(&plan.target_path)?, b"aligned");
        assert!(!plan.output_path.exists());
        Ok(())
    }

    // A symlink stands in for a case-insensitive alias such as `video_001.AVI`
    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_source_that_aliases_target() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let plan = plan_in(dir.path(), "video_001.AVI", "video_001.avi");
        fs::write(&plan.target_path, b"original")?;
        std::os::unix::fs::symlink(&plan.target_path, &plan.source)?;
        fs::write(&plan.output_path, b"aligned")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("tmp_align_", Some(200), Some(10.0));
        let config = CoreConfig::default();
        let inspector = StreamInspector::new(&runner, &config);

        commit(&inspector, &plan)?;
        assert_eq!(fs::read(&plan.target_path)?, b"aligned");
        assert!(fs::symlink_metadata(&plan.source).is_ok());
        assert_eq!(fs::read(&plan.source)?, b"aligned");
        assert!(!plan.output_path.exists());
        Ok(())
    }

    #[test]
    fn test_mismatch_discards_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let plan = plan_in(dir.path(), "video_001.mp4", "video_001.avi");
        fs::write(&plan.source, b"original")?;
        fs::write(&plan.output_path, b"short")?;

        let runner = MockCommandRunner::new();
        runner.expect_probe("tmp_align_", Some(199), Some(9.95));
        let config = CoreConfig::default();
        let inspector = StreamInspector::new(&runner, &config);

        let result = commit(&inspector, &plan);
        assert!(matches!(
            result,
            Err(CoreError::VerificationMismatch {
                expected: 200,
                actual: Some(199),
                ..
            })
        ));
        assert_eq!(fs::read(&plan.source)?, b"original");
        assert!(!plan.output_path.exists());
        assert!(!plan.target_path.exists());
        Ok(())
    }
}
