mod collect;

use std::sync::Arc;

use crate::{
    Result,
    store::{DbCollection, DbStore, Store, data::*},
};
use collect::Collect;

#[derive(Debug, Clone)]
pub struct MemStore {
    flows: Arc<Collect<Flow>>,
    specialties: Arc<Collect<Specialty>>,
}

/// Record kept in a [`Collect`].
trait DbDocument {
    fn id(&self) -> &str;
    /// ordering used by queries
    fn sort_key(&self) -> String;
}

impl DbDocument for Flow {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl DbDocument for Specialty {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DbStore for MemStore {
    fn init(
        &self,
        s: &Store,
    ) -> Result<()> {
        s.register(self.flows())?;
        s.register(self.specialties())?;
        Ok(())
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            flows: Arc::new(Collect::new("flows")),
            specialties: Arc::new(Collect::new("specialties")),
        }
    }

    pub fn flows(&self) -> Arc<dyn DbCollection<Item = Flow> + Send + Sync> {
        self.flows.clone()
    }

    pub fn specialties(&self) -> Arc<dyn DbCollection<Item = Specialty> + Send + Sync> {
        self.specialties.clone()
    }
}
