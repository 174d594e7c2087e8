use serde::{Deserialize, Serialize};

use crate::catalog::StepType;

/// step id
pub type StepId = String;

/// Coordinate persisted alongside a step by the editing UI.
///
/// This is only a hint kept for round-tripping; the layout engine always
/// computes positions from sequence order and never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPosition {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// One clinical stage of a flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepModel {
    pub id: StepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    /// step type code, e.g. `st-lab` or `laboratory`
    #[serde(default)]
    pub step_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type_name: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// intended sequence position, neither contiguous nor unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<StoredPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl StepModel {
    pub fn new(
        id: impl Into<String>,
        step_type_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            step_type_id: step_type_id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Missing order index sorts as 0.
    pub fn sort_key(&self) -> i64 {
        self.order_index.unwrap_or(0)
    }

    pub fn step_type(&self) -> StepType {
        StepType::from_code(&self.step_type_id)
    }

    /// Duration in minutes if it carries a displayable (non-zero) value.
    pub fn duration(&self) -> Option<f64> {
        self.duration_minutes.filter(|m| *m > 0.0)
    }

    /// Average cost if it carries a displayable (non-zero) value.
    pub fn average_cost(&self) -> Option<f64> {
        self.cost_avg.filter(|c| *c > 0.0)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}
