//! Baseline snapshots for edits that span several CLI invocations.
//!
//! `routines edit` stores the fetched list at
//! `<home>/.mymind/edits/<owner>.json` together with a SHA-256 digest.
//! Before `routines save` writes anything, the current server list is
//! digested and compared so edits made elsewhere in the meantime are not
//! silently overwritten.
//!
//! Signal precedence:
//! 1. `NoSnapshot` (no edit in progress)
//! 2. `Moved` (server list digest differs from the snapshot)
//! 3. `Current`

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mymind_core::{storage, RoutineItem, UserId};

use crate::error::{io_err, SyncError};

/// On-disk snapshot payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub owner: UserId,
    pub taken_at: DateTime<Utc>,
    pub digest: String,
    pub items: Vec<RoutineItem>,
}

impl BaselineSnapshot {
    pub fn new(owner: UserId, items: Vec<RoutineItem>) -> Result<Self, SyncError> {
        Ok(Self {
            owner,
            taken_at: Utc::now(),
            digest: digest(&items)?,
            items,
        })
    }
}

/// Result of comparing a snapshot with the live server list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineSignal {
    NoSnapshot,
    Current,
    Moved {
        added: usize,
        removed: usize,
        changed: usize,
    },
}

impl BaselineSignal {
    pub fn describe(&self) -> String {
        match self {
            BaselineSignal::NoSnapshot => "no edit in progress".to_string(),
            BaselineSignal::Current => "unchanged".to_string(),
            BaselineSignal::Moved {
                added,
                removed,
                changed,
            } => format!("{added} added, {removed} removed, {changed} changed"),
        }
    }
}

/// Hex SHA-256 over the list's JSON encoding. Order-sensitive.
pub fn digest(items: &[RoutineItem]) -> Result<String, SyncError> {
    let mut h = Sha256::new();
    for item in items {
        let encoded = serde_json::to_vec(item)?;
        h.update((encoded.len() as u64).to_le_bytes());
        h.update(&encoded);
    }
    Ok(hex::encode(h.finalize()))
}

/// Owner ids become file names under `edits/`; only plain names are allowed.
fn edit_file_stem(owner: &UserId) -> Result<&str, SyncError> {
    let stem = owner.as_str();
    let plain = !stem.is_empty()
        && !stem.starts_with('.')
        && !stem.contains(['/', '\\', '\0'])
        && !stem.contains("..");
    if plain {
        Ok(stem)
    } else {
        Err(SyncError::InvalidOwner {
            owner: owner.clone(),
        })
    }
}

/// `<home>/.mymind/edits/<owner>.json`
pub fn snapshot_path_at(home: &Path, owner: &UserId) -> Result<PathBuf, SyncError> {
    let stem = edit_file_stem(owner)?;
    Ok(storage::edits_dir_at(home).join(format!("{stem}.json")))
}

/// Default working file beside the snapshot: `<home>/.mymind/edits/<owner>.yaml`
pub fn working_path_at(home: &Path, owner: &UserId) -> Result<PathBuf, SyncError> {
    let stem = edit_file_stem(owner)?;
    Ok(storage::edits_dir_at(home).join(format!("{stem}.yaml")))
}

/// Load the snapshot for `owner`, or `None` if no edit is in progress.
pub fn load_at(home: &Path, owner: &UserId) -> Result<Option<BaselineSnapshot>, SyncError> {
    let path = snapshot_path_at(home, owner)?;
    match storage::read_optional(&path)? {
        None => Ok(None),
        Some(contents) => Ok(Some(serde_json::from_str(&contents)?)),
    }
}

/// Save atomically (`.tmp` + rename, mode 0600).
pub fn save_at(home: &Path, snapshot: &BaselineSnapshot) -> Result<(), SyncError> {
    let path = snapshot_path_at(home, &snapshot.owner)?;
    let json = serde_json::to_string_pretty(snapshot)?;
    storage::write_atomic(&path, &json)?;
    tracing::debug!("saved baseline snapshot: {}", path.display());
    Ok(())
}

/// Remove the snapshot; absent is fine.
pub fn remove_at(home: &Path, owner: &UserId) -> Result<(), SyncError> {
    let path = snapshot_path_at(home, owner)?;
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Compare `snapshot` with the list the server returns now.
pub fn check(
    snapshot: Option<&BaselineSnapshot>,
    server: &[RoutineItem],
) -> Result<BaselineSignal, SyncError> {
    let Some(snapshot) = snapshot else {
        return Ok(BaselineSignal::NoSnapshot);
    };
    if digest(server)? == snapshot.digest {
        return Ok(BaselineSignal::Current);
    }

    let before: HashMap<_, _> = snapshot
        .items
        .iter()
        .filter_map(|i| i.id.map(|id| (id, i)))
        .collect();
    let after_ids: HashSet<_> = server.iter().filter_map(|i| i.id).collect();

    let mut added = 0;
    let mut changed = 0;
    for item in server {
        match item.id.and_then(|id| before.get(&id)) {
            None => added += 1,
            Some(old) if *old != item => changed += 1,
            Some(_) => {}
        }
    }
    let removed = before.keys().filter(|id| !after_ids.contains(id)).count();

    if added == 0 && removed == 0 && changed == 0 {
        // Same items, different order.
        changed = server.len().min(1);
    }
    Ok(BaselineSignal::Moved {
        added,
        removed,
        changed,
    })
}
