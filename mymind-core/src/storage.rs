//! Local storage layout and atomic file writes.
//!
//! # Storage layout
//!
//! ```text
//! ~/.mymind/                (mode 0700)
//!   config.yaml             (optional; defaults when absent)
//!   session.json            (logged-in account ids, mode 0600)
//!   edits/
//!     <child_user_id>.json  (baseline snapshot for an open edit)
//! ```
//!
//! # API pattern
//!
//! Every function touching the home directory has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};

/// `<home>/.mymind/`
pub fn root_at(home: &Path) -> PathBuf {
    home.join(".mymind")
}

/// `<home>/.mymind/config.yaml`
pub fn config_path_at(home: &Path) -> PathBuf {
    root_at(home).join("config.yaml")
}

/// `<home>/.mymind/session.json`
pub fn session_path_at(home: &Path) -> PathBuf {
    root_at(home).join("session.json")
}

/// `<home>/.mymind/edits/`
pub fn edits_dir_at(home: &Path) -> PathBuf {
    root_at(home).join("edits")
}

/// Resolve the user's home directory.
pub fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

/// Create `dir` (and parents) if absent, restricting it to the owner.
pub fn ensure_private_dir(dir: &Path) -> Result<(), CoreError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }
    Ok(())
}

/// Atomically replace `path` with `contents`.
///
/// Write flow: `<name>.tmp` sibling → `chmod 0600` → `rename`. The `.tmp` is
/// always in the target's directory so the rename never crosses filesystems.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CoreError> {
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("path has no parent")));
    };
    // Bare file name: current directory.
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    ensure_private_dir(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = dir.join(format!("{file_name}.tmp"));
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Read `path`, returning `None` when it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>, CoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}
