//! In-memory routine edit session.
//!
//! Mirrors the parent's "edit routines" mode: the working copy starts as a
//! deep copy of the baseline, is edited by position, and is pushed with
//! [`EditSession::save`]. A failed save leaves the session editable.
//!
//! Embedders keep one session alive across edits. The CLI builds one per
//! `routines save` from the live list and the working file; see
//! [`crate::pipeline`].

use mymind_core::{DayOfWeek, RoutineItem, UserId};

use crate::error::{ReconcileError, SyncError};
use crate::plan::{plan, ChangePlan};
use crate::reconcile::{reconcile, ReconcileOutcome};
use crate::remote::RoutineRemote;

#[derive(Debug, Clone)]
pub struct EditSession {
    owner: UserId,
    baseline: Vec<RoutineItem>,
    working: Vec<RoutineItem>,
}

impl EditSession {
    pub fn begin(owner: UserId, baseline: Vec<RoutineItem>) -> Self {
        let working = baseline.clone();
        Self {
            owner,
            baseline,
            working,
        }
    }

    /// Fetch the owner's list and start editing it.
    pub fn fetch<R: RoutineRemote + ?Sized>(remote: &mut R, owner: UserId) -> Result<Self, SyncError> {
        let baseline = remote.list(&owner)?;
        Ok(Self::begin(owner, baseline))
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn baseline(&self) -> &[RoutineItem] {
        &self.baseline
    }

    pub fn working(&self) -> &[RoutineItem] {
        &self.working
    }

    /// Append a new item. Without a title it is named "Routine N" after the
    /// new list length. Returns its position.
    pub fn add(&mut self, title: Option<String>) -> usize {
        let title = title.unwrap_or_else(|| format!("Routine {}", self.working.len() + 1));
        self.working
            .push(RoutineItem::new(title, self.owner.clone()));
        self.working.len() - 1
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> Result<(), SyncError> {
        self.item_mut(index)?.title = title.into();
        Ok(())
    }

    pub fn reschedule(
        &mut self,
        index: usize,
        time: impl Into<String>,
        day: Option<DayOfWeek>,
    ) -> Result<(), SyncError> {
        let item = self.item_mut(index)?;
        item.time = time.into();
        item.day_of_week = day;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<RoutineItem, SyncError> {
        let len = self.working.len();
        if index >= len {
            return Err(SyncError::IndexOutOfRange { index, len });
        }
        Ok(self.working.remove(index))
    }

    /// Replace the whole working copy, e.g. with a hand-edited file.
    pub fn replace_working(&mut self, working: Vec<RoutineItem>) {
        self.working = working;
    }

    /// Writes a save would issue right now.
    pub fn pending(&self) -> Result<ChangePlan, ReconcileError> {
        plan(&self.baseline, &self.working)
    }

    pub fn is_dirty(&self) -> bool {
        self.pending().map(|p| !p.is_empty()).unwrap_or(true)
    }

    /// Throw away local edits.
    pub fn discard(&mut self) {
        self.working = self.baseline.clone();
    }

    /// Reconcile the working copy against the remote collection.
    ///
    /// On success the returned baseline becomes both baseline and working
    /// copy. On failure the session stays in edit mode; ids assigned by
    /// creates that went through are kept in the working copy.
    pub fn save<R: RoutineRemote + ?Sized>(
        &mut self,
        remote: &mut R,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let outcome = reconcile(remote, &self.owner, &self.baseline, &mut self.working)?;
        self.baseline = outcome.baseline.clone();
        self.working = self.baseline.clone();
        Ok(outcome)
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut RoutineItem, SyncError> {
        let len = self.working.len();
        self.working
            .get_mut(index)
            .ok_or(SyncError::IndexOutOfRange { index, len })
    }
}
