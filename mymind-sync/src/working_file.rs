//! Hand-editable YAML working copy.
//!
//! The file is a plain YAML sequence of routine items. Items without an
//! `id` are new; deleting an entry deletes the routine on save.

use std::path::Path;

use mymind_core::{storage, RoutineItem};

use crate::error::{io_err, SyncError};

const HEADER: &str = "\
# Routine working copy. Edit titles/time/dayOfWeek, add entries without an
# `id` to create routines, remove entries to delete them, then run
# `mymind routines save`.
";

/// Render items as the working-file YAML (header comment included).
pub fn render(items: &[RoutineItem]) -> Result<String, SyncError> {
    Ok(format!("{HEADER}{}", to_yaml(items)?))
}

/// Items as bare YAML, no header. Used for diffs.
pub fn to_yaml(items: &[RoutineItem]) -> Result<String, SyncError> {
    if items.is_empty() {
        return Ok("[]\n".to_string());
    }
    Ok(serde_yaml::to_string(items)?)
}

pub fn read(path: &Path) -> Result<Vec<RoutineItem>, SyncError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(&contents).map_err(|source| SyncError::WorkingFileParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically (re)write the working file.
pub fn write(path: &Path, items: &[RoutineItem]) -> Result<(), SyncError> {
    storage::write_atomic(path, &render(items)?)?;
    Ok(())
}
