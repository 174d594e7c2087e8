use serde::{Deserialize, Serialize};

use crate::{MedflowError, Result};

/// Medical specialty a flow belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyModel {
    pub id: String,
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl SpecialtyModel {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<SpecialtyModel>(s).map_err(|e| MedflowError::Convert(format!("invalid specialty: {}", e)))
    }

    /// Whether a flow's specialty reference points at this specialty.
    ///
    /// Flows coming from different sources reference specialties by id, by
    /// code or only by display name, so all three are accepted.
    pub fn matches(
        &self,
        specialty_id: Option<&str>,
        specialty_name: Option<&str>,
    ) -> bool {
        if let Some(sid) = specialty_id {
            if sid == self.id || (!self.code.is_empty() && sid == self.code) {
                return true;
            }
        }
        match specialty_name {
            Some(name) => !self.name.is_empty() && name.to_lowercase() == self.name.to_lowercase(),
            None => false,
        }
    }
}
