//! Routine list reconciliation.
//!
//! One pass runs three ordered phases and stops at the first failure:
//!
//! 1. **create** every working item without an id (working-list order); the
//!    stored item replaces the working entry so its new id is kept
//! 2. **update** every working item whose id is new to the baseline or whose
//!    fields changed (working-list order)
//! 3. **delete** every baseline id missing from the working list (baseline
//!    order)
//!
//! After the writes the authoritative list is re-fetched. The pass is not
//! transactional: a failure leaves earlier writes in place and is reported
//! with the phase, the item, and the writes already applied.

use mymind_core::{RoutineId, RoutineItem, UserId};

use crate::error::{Phase, ReconcileError};
use crate::plan::plan;
use crate::remote::RoutineRemote;

/// A write that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedOp {
    Created { id: RoutineId, title: String },
    Updated { id: RoutineId },
    Deleted { id: RoutineId },
}

impl AppliedOp {
    pub fn phase(&self) -> Phase {
        match self {
            AppliedOp::Created { .. } => Phase::Create,
            AppliedOp::Updated { .. } => Phase::Update,
            AppliedOp::Deleted { .. } => Phase::Delete,
        }
    }
}

/// Result of a successful write phase.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub applied: Vec<AppliedOp>,
    /// The new baseline: the refreshed server list when `refreshed`,
    /// otherwise the working copy with assigned ids.
    pub baseline: Vec<RoutineItem>,
    /// `false` when the post-write re-fetch failed. The writes succeeded but
    /// `baseline` is only the local view and must not be treated as
    /// authoritative.
    pub refreshed: bool,
    pub refresh_error: Option<mymind_client::ApiError>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Push `working` to the remote collection for `owner`, diffed against
/// `baseline`.
///
/// `working` is updated in place: created entries receive their server ids,
/// including when a later write fails, so a retry never re-creates them.
/// New items with an empty `owner_account` are created under `owner`.
pub fn reconcile<R>(
    remote: &mut R,
    owner: &UserId,
    baseline: &[RoutineItem],
    working: &mut [RoutineItem],
) -> Result<ReconcileOutcome, ReconcileError>
where
    R: RoutineRemote + ?Sized,
{
    let plan = plan(baseline, working)?;
    tracing::debug!(
        "reconcile {owner}: {} ({} baseline, {} working)",
        plan.summary(),
        baseline.len(),
        working.len()
    );

    let mut applied = Vec::with_capacity(plan.len());

    for &pos in &plan.creates {
        let mut body = working[pos].clone();
        if body.owner_account.is_empty() {
            body.owner_account = owner.clone();
        }
        match remote.create(&body) {
            Ok(created) => {
                let Some(id) = created.id else {
                    return Err(remote_failure(
                        Phase::Create,
                        None,
                        &body.title,
                        applied,
                        mymind_client::ApiError::UnexpectedBody {
                            url: "create".to_string(),
                            detail: "created routine has no id".to_string(),
                        },
                    ));
                };
                tracing::info!("created routine #{id} '{}'", created.title);
                applied.push(AppliedOp::Created {
                    id,
                    title: created.title.clone(),
                });
                working[pos] = created;
            }
            Err(source) => {
                return Err(remote_failure(Phase::Create, None, &body.title, applied, source))
            }
        }
    }

    for &pos in &plan.updates {
        let item = &working[pos];
        let Some(id) = item.id else { continue };
        if let Err(source) = remote.update(id, item) {
            return Err(remote_failure(Phase::Update, Some(id), &item.title, applied, source));
        }
        tracing::info!("updated routine #{id} '{}'", item.title);
        applied.push(AppliedOp::Updated { id });
    }

    for &id in &plan.deletes {
        if let Err(source) = remote.delete(id) {
            let title = baseline
                .iter()
                .find(|i| i.id == Some(id))
                .map(|i| i.title.as_str())
                .unwrap_or_default();
            return Err(remote_failure(Phase::Delete, Some(id), title, applied, source));
        }
        tracing::info!("deleted routine #{id}");
        applied.push(AppliedOp::Deleted { id });
    }

    match remote.list(owner) {
        Ok(fresh) => Ok(ReconcileOutcome {
            applied,
            baseline: fresh,
            refreshed: true,
            refresh_error: None,
        }),
        Err(err) => {
            tracing::warn!("writes for {owner} applied but refresh failed: {err}");
            Ok(ReconcileOutcome {
                applied,
                baseline: working.to_vec(),
                refreshed: false,
                refresh_error: Some(err),
            })
        }
    }
}

fn remote_failure(
    phase: Phase,
    item_id: Option<RoutineId>,
    title: &str,
    applied: Vec<AppliedOp>,
    source: mymind_client::ApiError,
) -> ReconcileError {
    tracing::warn!(
        "{phase} failed after {} applied write(s); stopping pass: {source}",
        applied.len()
    );
    ReconcileError::Remote {
        phase,
        item_id,
        title: title.to_string(),
        applied,
        source,
    }
}
