use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::{
    MedflowError, Result,
    model::{StepLink, StepModel},
};

/// How a flow came into existence.
///
/// A flow without steps renders differently depending on whether it was
/// generated from practice-management data (and simply has no authored
/// structure yet) or was authored and genuinely has zero steps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowOrigin {
    #[default]
    Authored,
    Generated,
}

/// A care pathway: an ordered sequence of clinical steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowModel {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "specialty_id", skip_serializing_if = "Option::is_none")]
    pub specialty_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// aggregate duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// steps in storage order; sequence order comes from `order_index`
    #[serde(default, alias = "steps")]
    pub nodes: Vec<StepModel>,
    #[serde(default)]
    pub edges: Vec<StepLink>,
    #[serde(default)]
    pub origin: FlowOrigin,
}

fn default_active() -> bool {
    true
}

impl FlowModel {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_active: true,
            ..Default::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let flow = serde_json::from_str::<FlowModel>(s);
        match flow {
            Ok(v) => Ok(v),
            Err(e) => Err(MedflowError::Flow(format!("{}", e))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_specialty(
        mut self,
        specialty_id: Option<&str>,
        specialty_name: Option<&str>,
    ) -> Self {
        self.specialty_id = specialty_id.map(str::to_string);
        self.specialty_name = specialty_name.map(str::to_string);
        self
    }

    pub fn with_step(
        mut self,
        step: StepModel,
    ) -> Self {
        self.nodes.push(step);
        self
    }

    pub fn with_origin(
        mut self,
        origin: FlowOrigin,
    ) -> Self {
        self.origin = origin;
        self
    }

    pub fn steps(&self) -> &[StepModel] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Steps in sequence order.
    ///
    /// Ties on `order_index` keep their storage order; the sort is stable.
    pub fn sorted_steps(&self) -> Vec<&StepModel> {
        let mut steps: Vec<&StepModel> = self.nodes.iter().collect();
        steps.sort_by_key(|s| s.sort_key());
        steps
    }

    /// Estimated cost if it carries a displayable (non-zero) value.
    pub fn estimated_cost(&self) -> Option<f64> {
        self.estimated_cost.filter(|c| *c > 0.0)
    }

    /// Aggregate duration, falling back to the sum of step durations.
    pub fn effective_duration(&self) -> f64 {
        match self.average_duration.filter(|d| *d > 0.0) {
            Some(d) => d,
            None => self.nodes.iter().filter_map(|s| s.duration_minutes).sum(),
        }
    }

    /// Aggregate cost, falling back to the sum of step average costs.
    pub fn effective_cost(&self) -> f64 {
        match self.estimated_cost() {
            Some(c) => c,
            None => self.nodes.iter().filter_map(|s| s.cost_avg).sum(),
        }
    }
}
