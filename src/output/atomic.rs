//! Atomic artifact writes

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SnapshotError};

/// Write `content` to a temp file next to `path`, then rename it into place.
///
/// On any failure the temp file is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let failure = |source: std::io::Error| SnapshotError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(failure)?;
    tmp.write_all(content).map_err(failure)?;
    tmp.flush().map_err(failure)?;
    tmp.persist(path).map_err(|err| failure(err.error))?;
    Ok(())
}
