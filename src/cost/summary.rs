use itertools::Itertools;
use serde::Serialize;

use crate::{FlowModel, StepModel, catalog::StepType};

/// Average cost spent on one step type.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StepTypeCost {
    pub step_type: StepType,
    pub steps: usize,
    pub cost_avg: f64,
}

/// Totals over the steps of a flow.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FlowCostSummary {
    pub flow_id: String,
    pub step_count: usize,
    /// sum of step durations in minutes
    pub total_duration: f64,
    pub total_cost_min: f64,
    pub total_cost_max: f64,
    pub total_cost_avg: f64,
    /// per step type, most expensive first
    pub by_step_type: Vec<StepTypeCost>,
}

impl FlowCostSummary {
    pub fn from_flow(flow: &FlowModel) -> Self {
        let steps = flow.steps();
        let sum = |f: fn(&StepModel) -> Option<f64>| steps.iter().filter_map(f).sum::<f64>();

        let by_step_type = steps
            .iter()
            .into_group_map_by(|s| s.step_type())
            .into_iter()
            .map(|(step_type, group)| StepTypeCost {
                step_type,
                steps: group.len(),
                cost_avg: group.iter().filter_map(|s| s.cost_avg).sum(),
            })
            .sorted_by(|a, b| b.cost_avg.total_cmp(&a.cost_avg).then_with(|| a.step_type.as_ref().cmp(b.step_type.as_ref())))
            .collect();

        Self {
            flow_id: flow.id.clone(),
            step_count: steps.len(),
            total_duration: sum(|s| s.duration_minutes),
            total_cost_min: sum(|s| s.cost_min),
            total_cost_max: sum(|s| s.cost_max),
            total_cost_avg: sum(|s| s.cost_avg),
            by_step_type,
        }
    }
}
