//! Logged-in account ids at `~/.mymind/session.json`.
//!
//! Holds at most one parent and one child id. Requests are authenticated by
//! sending the id for the acting [`Role`] as `X-User-Id`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::storage;
use crate::types::UserId;

/// Which side of the household is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_user_id: Option<UserId>,
}

impl Session {
    pub fn user_id(&self, role: Role) -> Option<&UserId> {
        match role {
            Role::Parent => self.parent_user_id.as_ref(),
            Role::Child => self.child_user_id.as_ref(),
        }
        .filter(|id| !id.is_empty())
    }

    pub fn set(&mut self, role: Role, id: UserId) {
        match role {
            Role::Parent => self.parent_user_id = Some(id),
            Role::Child => self.child_user_id = Some(id),
        }
    }

    /// Forget the id for `role`. Returns the id that was stored, if any.
    pub fn clear(&mut self, role: Role) -> Option<UserId> {
        match role {
            Role::Parent => self.parent_user_id.take(),
            Role::Child => self.child_user_id.take(),
        }
    }
}

/// Load the session; a missing file is an empty session.
pub fn load_at(home: &Path) -> Result<Session, CoreError> {
    let path = storage::session_path_at(home);
    match storage::read_optional(&path)? {
        None => Ok(Session::default()),
        Some(contents) => serde_json::from_str(&contents)
            .map_err(|source| CoreError::SessionParse { path, source }),
    }
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Session, CoreError> {
    load_at(&storage::home()?)
}

/// Atomically persist the session (mode 0600).
pub fn save_at(home: &Path, session: &Session) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(session)?;
    storage::write_atomic(&storage::session_path_at(home), &json)
}

/// `save_at` convenience wrapper.
pub fn save(session: &Session) -> Result<(), CoreError> {
    save_at(&storage::home()?, session)
}
