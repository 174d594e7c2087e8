use serde::{Deserialize, Serialize};

use crate::{
    FlowModel, MedflowError, Result,
    store::{DbCollectionIden, StoreIden, query::FlowFilter},
};

/// Stored flow: filterable columns plus the full model serialized in `data`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Flow {
    pub id: String,
    pub name: String,
    pub specialty_id: Option<String>,
    pub specialty_name: Option<String>,
    pub description: String,
    /// effective duration in minutes
    pub average_duration: f64,
    /// effective cost
    pub estimated_cost: f64,
    pub is_active: bool,
    pub step_count: usize,
    pub link_count: usize,
    pub data: String,
    pub create_time: i64,
    pub update_time: i64,
    /// store-wide deploy counter, bumped on every write of this record
    #[serde(default)]
    pub revision: u64,
}

impl Flow {
    pub fn from_model(model: &FlowModel) -> Result<Self> {
        Ok(Self {
            id: model.id.clone(),
            name: model.name.clone(),
            specialty_id: model.specialty_id.clone(),
            specialty_name: model.specialty_name.clone(),
            description: model.description.clone().unwrap_or_default(),
            average_duration: model.effective_duration(),
            estimated_cost: model.effective_cost(),
            is_active: model.is_active,
            step_count: model.nodes.len(),
            link_count: model.edges.len(),
            data: model.to_json()?,
            create_time: 0,
            update_time: 0,
            revision: 0,
        })
    }

    pub fn model(&self) -> Result<FlowModel> {
        serde_json::from_str::<FlowModel>(&self.data).map_err(|e| MedflowError::Store(format!("corrupted flow record {}: {}", self.id, e)))
    }
}

impl DbCollectionIden for Flow {
    type Filter = FlowFilter;

    fn iden() -> StoreIden {
        StoreIden::Flows
    }
}
