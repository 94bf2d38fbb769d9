//! Transient output management.
//!
//! Transcoder output is first written next to the log under a reserved
//! `tmp_align_` name and only moved into place after verification. Any file
//! carrying that marker is an in-progress artifact: it is never a log, never
//! a companion video candidate, and may be swept up by `remove_stale_artifacts`
//! if a previous run was interrupted.

use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker reserved for in-progress transcoder output.
pub const TRANSIENT_MARKER: &str = "tmp_align_";

/// Returns true if the file name carries the transient marker.
#[must_use]
pub fn is_transient_artifact(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(TRANSIENT_MARKER))
        .unwrap_or(false)
}

/// Returns the transient output path for a log, scoped by the current process id.
///
/// Format: `<dir>/tmp_align_<logstem>_<pid>.<extension>`. The pid keeps runs
/// against disjoint directories from colliding; two runs over the same
/// directory are not supported.
pub fn transient_output_path(dir: &Path, log_stem: &str, extension: &str) -> PathBuf {
    dir.join(format!(
        "{TRANSIENT_MARKER}{log_stem}_{}.{extension}",
        std::process::id()
    ))
}

/// Finds every transient artifact under `root`.
pub fn find_stale_artifacts(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_transient_artifact(path))
        .collect()
}

/// Deletes transient artifacts left under `root` by interrupted runs.
///
/// Returns the number of files removed. Files that cannot be removed are
/// logged and skipped.
pub fn remove_stale_artifacts(root: &Path) -> CoreResult<usize> {
    let mut removed = 0;
    for path in find_stale_artifacts(root) {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed stale transient output {}", path.display());
                removed += 1;
            }
            Err(e) => log::warn!("Could not remove stale output {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}

/// Removes a transient output if it exists, logging instead of failing.
pub(crate) fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Failed to remove transient output {}: {}", path.display(), e);
        } else {
            log::debug!("Removed transient output {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_transient_output_path_format() {
        let path = transient_output_path(Path::new("/data/run1"), "data_001", "avi");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("tmp_align_data_001_"));
        assert!(name.ends_with(".avi"));
        assert!(is_transient_artifact(&path));
    }

    #[test]
    fn test_is_transient_artifact() {
        assert!(is_transient_artifact(Path::new("/x/tmp_align_data_001_12.avi")));
        assert!(!is_transient_artifact(Path::new("/x/video_001.avi")));
        assert!(!is_transient_artifact(Path::new("/tmp_align_dir/video_001.avi")));
    }

    #[test]
    fn test_remove_stale_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("session_a");
        fs::create_dir_all(&nested)?;
        fs::write(nested.join("tmp_align_data_001_99.avi"), b"partial")?;
        fs::write(nested.join("video_001.avi"), b"keep")?;

        assert_eq!(find_stale_artifacts(dir.path()).len(), 1);
        assert_eq!(remove_stale_artifacts(dir.path())?, 1);
        assert!(nested.join("video_001.avi").exists());
        assert!(find_stale_artifacts(dir.path()).is_empty());
        Ok(())
    }
}
