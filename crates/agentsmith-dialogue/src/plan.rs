//! The agent plan accumulated across dialogue turns, and the patch
//! merging that builds it.

use serde::{Deserialize, Serialize};

/// The structured plan the dialogue assembles. Fields are only ever
/// added to; `output` is the one field a later patch may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPlan {
    /// What the agent is for, set by the first recognized intent
    pub goal: String,
    /// Data the agent needs, unique and in insertion order
    pub inputs: Vec<String>,
    /// Steps the agent performs, in order
    pub actions: Vec<String>,
    /// Capabilities the agent relies on
    pub tools: Vec<String>,
    /// How results are delivered
    pub output: String,
}

/// A partial plan update produced by one scripted turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPatch {
    pub goal: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    pub output: Option<String>,
}

impl PlanPatch {
    /// A patch that only appends a tool
    pub fn add_tool(tool: impl Into<String>) -> Self {
        Self {
            tools: vec![tool.into()],
            ..Self::default()
        }
    }

    /// A patch that only sets the output channel
    pub fn set_output(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }
}

/// Merge a patch into an existing plan, producing a new value.
///
/// Pure and non-mutating: the existing plan is never aliased or
/// modified. `goal` is set once and kept thereafter; `inputs` stay
/// unique in insertion order; `actions` and `tools` are appended;
/// `output` is overwritten when the patch carries one.
pub fn merge(existing: Option<&AgentPlan>, patch: &PlanPatch) -> AgentPlan {
    let mut plan = existing.cloned().unwrap_or_default();

    if plan.goal.is_empty() {
        if let Some(ref goal) = patch.goal {
            plan.goal = goal.clone();
        }
    }
    for input in &patch.inputs {
        if !plan.inputs.contains(input) {
            plan.inputs.push(input.clone());
        }
    }
    plan.actions.extend(patch.actions.iter().cloned());
    plan.tools.extend(patch.tools.iter().cloned());
    if let Some(ref output) = patch.output {
        plan.output = output.clone();
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor_patch() -> PlanPatch {
        PlanPatch {
            goal: Some("Monitor and alert".into()),
            inputs: vec!["Price threshold".into(), "Target websites".into()],
            actions: vec!["Check prices".into(), "Compare values".into()],
            tools: vec!["Web scraper".into(), "Notifier".into()],
            output: Some("Alert notification".into()),
        }
    }

    #[test]
    fn test_merge_from_absent() {
        let plan = merge(None, &monitor_patch());
        assert_eq!(plan.goal, "Monitor and alert");
        assert_eq!(plan.inputs, vec!["Price threshold", "Target websites"]);
        assert_eq!(plan.output, "Alert notification");
    }

    #[test]
    fn test_merge_is_pure() {
        let base = merge(None, &monitor_patch());
        let snapshot = base.clone();
        let patch = PlanPatch::add_tool("Scheduler");

        let a = merge(Some(&base), &patch);
        let b = merge(Some(&base), &patch);
        assert_eq!(a, b);
        assert_eq!(base, snapshot, "merge must not mutate its input");
    }

    #[test]
    fn test_goal_set_once() {
        let base = merge(None, &monitor_patch());
        let patch = PlanPatch {
            goal: Some("Something else".into()),
            ..PlanPatch::default()
        };
        let merged = merge(Some(&base), &patch);
        assert_eq!(merged.goal, "Monitor and alert");
    }

    #[test]
    fn test_inputs_stay_unique() {
        let base = merge(None, &monitor_patch());
        let patch = PlanPatch {
            inputs: vec!["Price threshold".into(), "Currency".into()],
            ..PlanPatch::default()
        };
        let merged = merge(Some(&base), &patch);
        assert_eq!(
            merged.inputs,
            vec!["Price threshold", "Target websites", "Currency"]
        );
    }

    #[test]
    fn test_tools_appended_not_replaced() {
        let base = merge(None, &monitor_patch());
        let merged = merge(Some(&base), &PlanPatch::add_tool("Scheduler"));
        assert_eq!(merged.tools, vec!["Web scraper", "Notifier", "Scheduler"]);
    }

    #[test]
    fn test_output_overwritten() {
        let base = merge(None, &monitor_patch());
        let merged = merge(Some(&base), &PlanPatch::set_output("WhatsApp notification"));
        assert_eq!(merged.output, "WhatsApp notification");
        // everything else untouched
        assert_eq!(merged.goal, base.goal);
        assert_eq!(merged.tools, base.tools);
    }
}
