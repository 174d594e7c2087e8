use serde::{Deserialize, Serialize};

use crate::{
    SpecialtyModel,
    store::{DbCollectionIden, StoreIden, query::SpecialtyFilter},
};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Specialty {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub create_time: i64,
}

impl Specialty {
    pub fn from_model(model: &SpecialtyModel) -> Self {
        Self {
            id: model.id.clone(),
            code: model.code.clone(),
            name: model.name.clone(),
            is_active: model.is_active,
            create_time: 0,
        }
    }

    pub fn model(&self) -> SpecialtyModel {
        SpecialtyModel {
            id: self.id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            is_active: self.is_active,
        }
    }
}

impl DbCollectionIden for Specialty {
    type Filter = SpecialtyFilter;

    fn iden() -> StoreIden {
        StoreIden::Specialties
    }
}
