//! # mymind-sync
//!
//! Routine list reconciliation between a local working copy and the remote
//! routine collection.
//!
//! Call [`reconcile`] with a baseline and an edited working copy to push the
//! minimal create/update/delete set, or drive an [`EditSession`]. The
//! [`pipeline`] module persists edits across CLI invocations.

pub mod diff;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod plan;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod snapshot;
pub mod working_file;

pub use diff::{diff_lists, ListDiff};
pub use error::{Phase, ReconcileError, SyncError};
pub use plan::{plan, ChangePlan, PlanSummary};
pub use reconcile::{reconcile, AppliedOp, ReconcileOutcome};
pub use remote::RoutineRemote;
pub use session::EditSession;
