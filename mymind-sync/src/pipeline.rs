//! Multi-invocation edit flow used by the CLI.
//!
//! `begin` fetches the list, snapshots it and writes the working file;
//! `save` checks the snapshot against the server, loads the working file
//! into an [`EditSession`] over the live list, saves it and clears the
//! snapshot. The working file stays where it is; on failure it is rewritten
//! with any ids assigned before the failure so a retry does not duplicate
//! creates.

use std::path::Path;

use mymind_core::{RoutineItem, UserId};

use crate::diff::{diff_lists, ListDiff};
use crate::reconcile::ReconcileOutcome;
use crate::remote::RoutineRemote;
use crate::session::EditSession;
use crate::snapshot::{self, BaselineSignal, BaselineSnapshot};
use crate::{working_file, SyncError};

/// Options for [`save_at`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Plan only; no writes, snapshot kept.
    pub dry_run: bool,
    /// Save even if the server list moved since `begin`.
    pub force: bool,
}

/// Outcome of [`save_at`].
#[derive(Debug)]
pub enum SaveReport {
    /// `dry_run`: what would be written.
    Planned(ListDiff),
    /// Working copy already matches the server; snapshot cleared.
    NothingToDo,
    Saved(ReconcileOutcome),
}

/// Start editing `owner`'s routines: snapshot the server list and write it
/// to `working_path`.
pub fn begin_at<R: RoutineRemote + ?Sized>(
    home: &Path,
    remote: &mut R,
    owner: &UserId,
    working_path: &Path,
) -> Result<BaselineSnapshot, SyncError> {
    let session = EditSession::fetch(remote, owner.clone())?;
    let snap = BaselineSnapshot::new(owner.clone(), session.baseline().to_vec())?;
    snapshot::save_at(home, &snap)?;
    working_file::write(working_path, &snap.items)?;
    tracing::info!(
        "began edit for {owner}: {} routine(s) -> {}",
        snap.items.len(),
        working_path.display()
    );
    Ok(snap)
}

/// Diff the working file against the live server list. No writes.
pub fn diff_at<R: RoutineRemote + ?Sized>(
    remote: &mut R,
    owner: &UserId,
    working_path: &Path,
) -> Result<ListDiff, SyncError> {
    let working = working_file::read(working_path)?;
    let server = remote.list(owner)?;
    diff_lists(&server, &working)
}

/// Push the working file to the server.
pub fn save_at<R: RoutineRemote + ?Sized>(
    home: &Path,
    remote: &mut R,
    owner: &UserId,
    working_path: &Path,
    opts: SaveOptions,
) -> Result<SaveReport, SyncError> {
    let Some(snap) = snapshot::load_at(home, owner)? else {
        return Err(SyncError::NoEditInProgress {
            owner: owner.clone(),
        });
    };
    let server = remote.list(owner)?;

    match snapshot::check(Some(&snap), &server)? {
        BaselineSignal::NoSnapshot | BaselineSignal::Current => {}
        moved @ BaselineSignal::Moved { .. } => {
            if !opts.force {
                return Err(SyncError::BaselineMoved {
                    owner: owner.clone(),
                    detail: moved.describe(),
                });
            }
            tracing::warn!("saving over server changes for {owner}: {}", moved.describe());
        }
    }

    let mut session = EditSession::begin(owner.clone(), server);
    session.replace_working(working_file::read(working_path)?);

    if opts.dry_run {
        return Ok(SaveReport::Planned(diff_lists(
            session.baseline(),
            session.working(),
        )?));
    }

    match session.save(remote) {
        Ok(outcome) if outcome.is_noop() => {
            snapshot::remove_at(home, owner)?;
            Ok(SaveReport::NothingToDo)
        }
        Ok(outcome) => {
            snapshot::remove_at(home, owner)?;
            working_file::write(working_path, session.working())?;
            Ok(SaveReport::Saved(outcome))
        }
        Err(err) => {
            if !err.applied().is_empty() {
                preserve_progress(home, remote, owner, working_path, session.working());
            }
            Err(err.into())
        }
    }
}

/// Abandon the edit: drop the snapshot. The working file is left in place.
pub fn discard_at(home: &Path, owner: &UserId) -> Result<(), SyncError> {
    snapshot::remove_at(home, owner)
}

/// After a partial save, keep assigned ids in the working file and move the
/// snapshot to the new server state so the retry is not refused as moved.
fn preserve_progress<R: RoutineRemote + ?Sized>(
    home: &Path,
    remote: &mut R,
    owner: &UserId,
    working_path: &Path,
    working: &[RoutineItem],
) {
    if let Err(e) = working_file::write(working_path, working) {
        tracing::warn!("could not record assigned ids in {}: {e}", working_path.display());
    }
    let refreshed = remote
        .list(owner)
        .map_err(SyncError::from)
        .and_then(|items| BaselineSnapshot::new(owner.clone(), items))
        .and_then(|snap| snapshot::save_at(home, &snap));
    if let Err(e) = refreshed {
        tracing::warn!("could not refresh snapshot for {owner}: {e}");
    }
}
