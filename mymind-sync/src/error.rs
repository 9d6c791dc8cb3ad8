//! Error types for mymind-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use mymind_client::ApiError;
use mymind_core::{CoreError, RoutineId, UserId};

use crate::reconcile::AppliedOp;

/// Which of the three ordered write phases an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Create => write!(f, "create"),
            Phase::Update => write!(f, "update"),
            Phase::Delete => write!(f, "delete"),
        }
    }
}

/// Failure of a reconciliation pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The same id appears twice in one list. Checked before any remote call.
    #[error("routine id {id} appears more than once in the {list} list")]
    DuplicateId { id: RoutineId, list: &'static str },

    /// A remote write failed. Writes listed in `applied` already happened;
    /// nothing after the failing one was attempted.
    #[error("{phase} failed for {}: {source}", describe_item(.item_id, .title))]
    Remote {
        phase: Phase,
        item_id: Option<RoutineId>,
        title: String,
        applied: Vec<AppliedOp>,
        #[source]
        source: ApiError,
    },
}

impl ReconcileError {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ReconcileError::Remote { phase, .. } => Some(*phase),
            ReconcileError::DuplicateId { .. } => None,
        }
    }

    /// Writes that reached the server before the failure.
    pub fn applied(&self) -> &[AppliedOp] {
        match self {
            ReconcileError::Remote { applied, .. } => applied,
            ReconcileError::DuplicateId { .. } => &[],
        }
    }
}

fn describe_item(item_id: &Option<RoutineId>, title: &str) -> String {
    match item_id {
        Some(id) => format!("routine #{id} '{title}'"),
        None => format!("new routine '{title}'"),
    }
}

/// Errors from edit sessions, snapshots and the save pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("local storage error: {0}")]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Working file is not a valid YAML routine list.
    #[error("failed to parse working file {path}: {source}")]
    WorkingFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Child id that cannot be used as a file name under `edits/`.
    #[error("invalid child id '{owner}': must be non-empty, not start with '.', and not contain path separators or '..'")]
    InvalidOwner { owner: UserId },

    #[error("no routine edit in progress for {owner}; run `mymind routines edit {owner}` first")]
    NoEditInProgress { owner: UserId },

    /// The server list changed since the edit began.
    #[error("routines for {owner} changed on the server since editing began ({detail}); re-run edit or pass --force")]
    BaselineMoved { owner: UserId, detail: String },

    #[error("no routine at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
