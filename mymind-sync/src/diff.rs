//! Dry-run unified diff support for `mymind routines diff`.

use similar::TextDiff;

use mymind_core::RoutineItem;

use crate::plan::{plan, ChangePlan};
use crate::{working_file, SyncError};

/// What a save would change, as text and as a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiff {
    pub plan: ChangePlan,
    /// One line per planned write, see [`describe_plan`].
    pub lines: Vec<String>,
    /// Empty when the YAML renderings are identical.
    pub unified_diff: String,
}

impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}

/// Compare `baseline` (server) with `working` (local). No remote calls.
pub fn diff_lists(baseline: &[RoutineItem], working: &[RoutineItem]) -> Result<ListDiff, SyncError> {
    let plan = plan(baseline, working)?;
    let old = working_file::to_yaml(baseline)?;
    let new = working_file::to_yaml(working)?;

    let unified_diff = if old == new {
        String::new()
    } else {
        TextDiff::from_lines(&old, &new)
            .unified_diff()
            .header("a/server", "b/working")
            .context_radius(3)
            .to_string()
    };

    let lines = describe_plan(&plan, baseline, working);
    Ok(ListDiff {
        plan,
        lines,
        unified_diff,
    })
}

/// One line per planned write, in execution order.
pub fn describe_plan(plan: &ChangePlan, baseline: &[RoutineItem], working: &[RoutineItem]) -> Vec<String> {
    let mut lines = Vec::with_capacity(plan.len());
    for &pos in &plan.creates {
        lines.push(format!("+ create '{}'", working[pos].title));
    }
    for &pos in &plan.updates {
        let item = &working[pos];
        let id = item.id.map(|id| id.to_string()).unwrap_or_default();
        lines.push(format!("~ update #{id} '{}'", item.title));
    }
    for id in &plan.deletes {
        let title = baseline
            .iter()
            .find(|i| i.id == Some(*id))
            .map(|i| i.title.as_str())
            .unwrap_or_default();
        lines.push(format!("- delete #{id} '{title}'"));
    }
    lines
}
