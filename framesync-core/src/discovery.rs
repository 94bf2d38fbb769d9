//! Sensor log discovery.
//!
//! Walks the root directory tree for `.csv` logs (case-insensitive) and
//! loads each one into a [`LogRecord`] holding its data-row count. Transient
//! artifacts are skipped. Results are sorted by path so runs are
//! deterministic.

use crate::error::{CoreError, CoreResult};
use crate::temp_files::is_transient_artifact;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A sensor log and the number of samples it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// File stem, e.g. `data_001`
    pub id: String,
    /// Full path to the CSV file
    pub path: PathBuf,
    /// Number of data rows (header excluded)
    pub rows: u64,
    /// Directory the log lives in; the only place its companion is searched for
    pub dir: PathBuf,
}

impl LogRecord {
    /// Reads a CSV log and counts its data rows.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| CoreError::PathError(format!("No file name in {}", path.display())))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                CoreError::PathError(format!("No parent directory for {}", path.display()))
            })?;

        let rows = count_csv_rows(path)?;
        Ok(Self {
            id,
            path: path.to_path_buf(),
            rows,
            dir,
        })
    }
}

/// Counts the data rows of a CSV file, treating the first row as a header.
///
/// Rows may have differing field counts.
pub fn count_csv_rows(path: &Path) -> CoreResult<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = 0u64;
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        rows += 1;
    }
    Ok(rows)
}

/// Returns true for `.csv` files that are not transient artifacts.
#[must_use]
pub fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        && !is_transient_artifact(path)
}

/// Finds every sensor log under `root_dir`, recursively.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Sorted paths of the discovered logs
/// * `Err(CoreError::PathError)` - If `root_dir` is not a directory
/// * `Err(CoreError::NoLogsFound)` - If no logs exist under it
pub fn find_log_files(root_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !root_dir.is_dir() {
        return Err(CoreError::PathError(format!(
            "Root directory '{}' does not exist or is not a directory",
            root_dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_log_file(path))
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoLogsFound(root_dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}
