//! In-memory [`RoutineRemote`] that records every call.
//!
//! Behaves like the backend collection (ids assigned on create, 404 for
//! unknown ids) and can be told to fail the n-th call of a phase.

use std::collections::HashMap;

use mymind_client::ApiError;
use mymind_core::{RoutineId, RoutineItem, UserId};

use crate::error::Phase;
use crate::remote::RoutineRemote;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { title: String },
    Update { id: RoutineId, title: String },
    Delete { id: RoutineId },
    List { owner: UserId },
}

#[derive(Debug, Default)]
pub struct InMemoryRoutines {
    owner: UserId,
    items: Vec<RoutineItem>,
    next_id: i64,
    calls: Vec<Call>,
    attempts: HashMap<Phase, usize>,
    fail_at: Option<(Phase, usize)>,
    fail_list: bool,
}

impl InMemoryRoutines {
    /// A collection for `owner` already holding `items`.
    pub fn seeded(owner: UserId, items: Vec<RoutineItem>) -> Self {
        let next_id = items
            .iter()
            .filter_map(|i| i.id.map(|id| id.0))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            owner,
            items,
            next_id,
            ..Self::default()
        }
    }

    /// Make the `nth` (1-based) call of `phase` fail with a 500.
    pub fn fail_on(&mut self, phase: Phase, nth: usize) {
        self.fail_at = Some((phase, nth));
    }

    /// Make every `list` call fail with a transport error.
    pub fn fail_list(&mut self) {
        self.fail_list = true;
    }

    pub fn items(&self) -> &[RoutineItem] {
        &self.items
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Recorded calls excluding `list`.
    pub fn writes(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::List { .. }))
            .cloned()
            .collect()
    }

    /// Replace the stored list, as if another client edited it.
    pub fn replace_items(&mut self, items: Vec<RoutineItem>) {
        self.items = items;
    }

    fn check_injected(&mut self, phase: Phase) -> Result<(), ApiError> {
        let n = self.attempts.entry(phase).or_insert(0);
        *n += 1;
        if self.fail_at == Some((phase, *n)) {
            return Err(ApiError::ServerRejected {
                status: 500,
                message: format!("injected {phase} failure"),
            });
        }
        Ok(())
    }

    fn position(&self, id: RoutineId) -> Result<usize, ApiError> {
        self.items
            .iter()
            .position(|i| i.id == Some(id))
            .ok_or_else(|| ApiError::ServerRejected {
                status: 404,
                message: format!("routine {id} not found"),
            })
    }
}

impl RoutineRemote for InMemoryRoutines {
    fn create(&mut self, item: &RoutineItem) -> Result<RoutineItem, ApiError> {
        self.calls.push(Call::Create {
            title: item.title.clone(),
        });
        self.check_injected(Phase::Create)?;
        let mut stored = item.clone();
        stored.id = Some(RoutineId(self.next_id));
        self.next_id += 1;
        self.items.push(stored.clone());
        Ok(stored)
    }

    fn update(&mut self, id: RoutineId, item: &RoutineItem) -> Result<(), ApiError> {
        self.calls.push(Call::Update {
            id,
            title: item.title.clone(),
        });
        self.check_injected(Phase::Update)?;
        let pos = self.position(id)?;
        let mut stored = item.clone();
        stored.id = Some(id);
        self.items[pos] = stored;
        Ok(())
    }

    fn delete(&mut self, id: RoutineId) -> Result<(), ApiError> {
        self.calls.push(Call::Delete { id });
        self.check_injected(Phase::Delete)?;
        let pos = self.position(id)?;
        self.items.remove(pos);
        Ok(())
    }

    fn list(&mut self, owner: &UserId) -> Result<Vec<RoutineItem>, ApiError> {
        self.calls.push(Call::List {
            owner: owner.clone(),
        });
        if self.fail_list {
            return Err(ApiError::Network {
                url: "memory://list".to_string(),
                message: "connection reset".to_string(),
            });
        }
        if *owner != self.owner {
            return Ok(Vec::new());
        }
        Ok(self.items.clone())
    }
}
