//! Pre-write backup copies.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::diagnostic::GenError;

/// Path of the backup copy of `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copies `path` to its backup location, replacing an older backup.
///
/// Returns `Ok(None)` when there is nothing to back up.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>, GenError> {
    if !path.is_file() {
        return Ok(None);
    }

    let target = backup_path(path);
    std::fs::copy(path, &target).map_err(|e| GenError::io(&target, e.to_string()))?;
    info!(from = %path.display(), to = %target.display(), "backup written");
    Ok(Some(target))
}
