use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::errors::ReportError;
use crate::models::TestOutcome;

/// The sibling file a report is staged in before being renamed into place.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("test-results.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically write content to a file using a temporary file + rename.
///
/// On failure the destination is left as it was and the temporary file is
/// removed.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp = staging_path(path);
    let result = write_locked(&temp, content).and_then(|()| fs::rename(&temp, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_locked(temp: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.lock_exclusive()?;
    file.write_all(content)?;
    file.sync_all()?;
    file.unlock()
}

/// Serializes `outcomes` as a JSON array and replaces the report at `path`.
pub fn write_report(path: &Path, outcomes: &[TestOutcome]) -> Result<(), ReportError> {
    let content = serde_json::to_string_pretty(outcomes).map_err(ReportError::Serialize)?;
    debug!(path = %path.display(), entries = outcomes.len(), "writing report");

    atomic_write(path, content.as_bytes()).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), entries = outcomes.len(), "report written");
    Ok(())
}

/// Loads a report previously written by [`write_report`].
pub fn read_report(path: &Path) -> Result<Vec<TestOutcome>, ReportError> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReportError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}
