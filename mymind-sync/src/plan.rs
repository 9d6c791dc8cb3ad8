//! Pure change planning between a baseline and a working copy.

use std::collections::{HashMap, HashSet};

use mymind_core::{RoutineId, RoutineItem};

use crate::error::ReconcileError;

/// Writes needed to turn `baseline` into `working`, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePlan {
    /// Positions in `working` of items without an id.
    pub creates: Vec<usize>,
    /// Positions in `working` of items whose id is new to the baseline or
    /// whose fields differ from the baseline item with that id.
    pub updates: Vec<usize>,
    /// Baseline ids absent from `working`, in baseline order.
    pub deletes: Vec<RoutineId>,
}

impl ChangePlan {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Number of remote writes the plan will issue.
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            creates: self.creates.len(),
            updates: self.updates.len(),
            deletes: self.deletes.len(),
        }
    }
}

/// Operation counts, for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete",
            self.creates, self.updates, self.deletes
        )
    }
}

/// Compute the [`ChangePlan`] for one reconciliation pass.
///
/// Duplicate ids in either list are rejected rather than guessed at.
pub fn plan(baseline: &[RoutineItem], working: &[RoutineItem]) -> Result<ChangePlan, ReconcileError> {
    let by_id = index_by_id(baseline, "baseline")?;
    let mut seen = HashSet::new();
    let mut out = ChangePlan::default();

    for (pos, item) in working.iter().enumerate() {
        let Some(id) = item.id else {
            out.creates.push(pos);
            continue;
        };
        if !seen.insert(id) {
            return Err(ReconcileError::DuplicateId {
                id,
                list: "working",
            });
        }
        match by_id.get(&id) {
            Some(original) if *original == item => {}
            _ => out.updates.push(pos),
        }
    }

    out.deletes = baseline
        .iter()
        .filter_map(|item| item.id)
        .filter(|id| !seen.contains(id))
        .collect();

    Ok(out)
}

fn index_by_id<'a>(
    items: &'a [RoutineItem],
    list: &'static str,
) -> Result<HashMap<RoutineId, &'a RoutineItem>, ReconcileError> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(id) = item.id {
            if map.insert(id, item).is_some() {
                return Err(ReconcileError::DuplicateId { id, list });
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use mymind_core::UserId;

    use super::*;

    fn item(id: Option<i64>, title: &str) -> RoutineItem {
        let base = RoutineItem::new(title, UserId::from("31"));
        match id {
            Some(id) => base.with_id(id),
            None => base,
        }
    }

    #[test]
    fn identical_lists_plan_nothing() {
        let baseline = vec![item(Some(1), "A"), item(Some(2), "B")];
        let plan = plan(&baseline, &baseline.clone()).expect("plan");
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn reordering_alone_plans_nothing() {
        let baseline = vec![item(Some(1), "A"), item(Some(2), "B")];
        let working = vec![item(Some(2), "B"), item(Some(1), "A")];
        assert!(plan(&baseline, &working).expect("plan").is_empty());
    }

    #[test]
    fn mixed_edit_plans_each_kind() {
        let baseline = vec![item(Some(1), "A"), item(Some(2), "B")];
        let working = vec![item(Some(1), "A2"), item(None, "C")];
        let plan = plan(&baseline, &working).expect("plan");
        assert_eq!(plan.creates, vec![1]);
        assert_eq!(plan.updates, vec![0]);
        assert_eq!(plan.deletes, vec![RoutineId(2)]);
        assert_eq!(plan.summary().to_string(), "1 to create, 1 to update, 1 to delete");
    }

    #[test]
    fn unknown_id_in_working_is_an_update() {
        let baseline = vec![item(Some(1), "A")];
        let working = vec![item(Some(1), "A"), item(Some(7), "stray")];
        let plan = plan(&baseline, &working).expect("plan");
        assert_eq!(plan.updates, vec![1]);
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn schedule_change_counts_as_edit() {
        let baseline = vec![item(Some(1), "A")];
        let mut edited = item(Some(1), "A");
        edited.time = "07:30".into();
        let plan = plan(&baseline, &[edited]).expect("plan");
        assert_eq!(plan.updates, vec![0]);
    }

    #[test]
    fn duplicate_working_id_is_rejected() {
        let baseline = vec![item(Some(1), "A")];
        let working = vec![item(Some(1), "A"), item(Some(1), "A again")];
        let err = plan(&baseline, &working).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::DuplicateId { id: RoutineId(1), list: "working" }
        ));
    }

    #[test]
    fn duplicate_baseline_id_is_rejected() {
        let baseline = vec![item(Some(3), "A"), item(Some(3), "B")];
        let err = plan(&baseline, &[]).unwrap_err();
        assert!(matches!(err, ReconcileError::DuplicateId { list: "baseline", .. }));
    }
}
