use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::trace;

use crate::{FlowModel, MedflowError, Result, ShareLock, SpecialtyModel, utils};

use super::{DbCollection, DbCollectionIden, StoreIden, data::*, map_db_err};

#[derive(Clone)]
pub struct DynDbSetRef<T>(Arc<dyn DbCollection<Item = T>>);

/// Registry of collections, looked up by record type.
pub struct Store {
    collections: ShareLock<HashMap<StoreIden, Arc<dyn Any + Send + Sync + 'static>>>,
    /// last revision handed out by `deploy`; never reused, even across removals
    revision: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            revision: AtomicU64::new(0),
        }
    }

    pub fn collection<DATA>(&self) -> Result<Arc<dyn DbCollection<Item = DATA>>>
    where
        DATA: DbCollectionIden + Send + Sync + 'static,
    {
        let collections = self.collections.read().map_err(map_db_err)?;

        let collection = collections.get(&DATA::iden()).ok_or_else(|| MedflowError::Store(format!("fail to get collection: {}", DATA::iden().as_ref())))?;

        collection
            .downcast_ref::<DynDbSetRef<DATA>>()
            .map(|v| v.0.clone())
            .ok_or_else(|| MedflowError::Store(format!("fail to get collection: {}", DATA::iden().as_ref())))
    }

    pub fn register<DATA>(
        &self,
        collection: Arc<dyn DbCollection<Item = DATA> + Send + Sync + 'static>,
    ) -> Result<()>
    where
        DATA: DbCollectionIden + 'static,
    {
        let mut collections = self.collections.write().map_err(map_db_err)?;
        collections.insert(DATA::iden(), Arc::new(DynDbSetRef::<DATA>(collection)));
        Ok(())
    }

    pub fn flows(&self) -> Result<Arc<dyn DbCollection<Item = Flow>>> {
        self.collection()
    }

    pub fn specialties(&self) -> Result<Arc<dyn DbCollection<Item = Specialty>>> {
        self.collection()
    }

    /// Inserts or replaces a flow.
    ///
    /// The creation time of an existing record is kept. Every call stamps the
    /// record with a fresh revision.
    pub fn deploy(
        &self,
        flow: &FlowModel,
    ) -> Result<bool> {
        trace!("store::deploy({})", flow.id);
        if flow.id.trim().is_empty() {
            return Err(MedflowError::Flow("missing id in flow".into()));
        }
        let flows = self.flows()?;
        let mut data = Flow::from_model(flow)?;
        data.revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        match flows.find(&flow.id) {
            Ok(m) => {
                data.create_time = m.create_time;
                data.update_time = utils::time::time_millis();
                flows.update(&data)
            }
            Err(MedflowError::NotFound { .. }) => {
                data.create_time = utils::time::time_millis();
                flows.create(&data)
            }
            Err(e) => Err(e),
        }
    }

    /// Inserts or replaces a specialty.
    pub fn register_specialty(
        &self,
        specialty: &SpecialtyModel,
    ) -> Result<bool> {
        trace!("store::register_specialty({})", specialty.id);
        if specialty.id.trim().is_empty() {
            return Err(MedflowError::Store("missing id in specialty".into()));
        }
        let specialties = self.specialties()?;
        let mut data = Specialty::from_model(specialty);
        match specialties.find(&specialty.id) {
            Ok(m) => {
                data.create_time = m.create_time;
                specialties.update(&data)
            }
            Err(MedflowError::NotFound { .. }) => {
                data.create_time = utils::time::time_millis();
                specialties.create(&data)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        StepModel,
        store::{DbStore, MemStore},
    };

    fn store() -> Store {
        let store = Store::new();
        MemStore::new().init(&store).unwrap();
        store
    }

    #[test]
    fn test_unregistered_collection() {
        let store = Store::new();
        let err = store.flows().err().unwrap();
        assert_eq!(err, MedflowError::Store("fail to get collection: flows".to_string()));
    }

    #[test]
    fn test_deploy_upserts_and_keeps_create_time() {
        let store = store();
        let mut flow = FlowModel::new("flow-1", "Checkup").with_step(StepModel::new("a", "st-cons", "A"));

        assert!(store.deploy(&flow).unwrap());
        let first = store.flows().unwrap().find("flow-1").unwrap();
        assert!(first.create_time > 0);
        assert_eq!(first.update_time, 0);
        assert_eq!(first.step_count, 1);

        flow.name = "Checkup v2".to_string();
        assert!(store.deploy(&flow).unwrap());
        let second = store.flows().unwrap().find("flow-1").unwrap();
        assert_eq!(second.create_time, first.create_time);
        assert!(second.update_time > 0);
        assert_eq!(second.model().unwrap().name, "Checkup v2");
    }

    #[test]
    fn test_deploy_bumps_revision() {
        let store = store();
        let flow = FlowModel::new("flow-1", "Checkup");

        store.deploy(&flow).unwrap();
        let first = store.flows().unwrap().find("flow-1").unwrap().revision;
        store.deploy(&flow).unwrap();
        let second = store.flows().unwrap().find("flow-1").unwrap().revision;
        assert!(first > 0 && second > first);

        // a removed and recreated flow does not reuse an old revision
        store.flows().unwrap().delete("flow-1").unwrap();
        store.deploy(&flow).unwrap();
        assert!(store.flows().unwrap().find("flow-1").unwrap().revision > second);
    }

    #[test]
    fn test_deploy_rejects_empty_id() {
        let err = store().deploy(&FlowModel::new("  ", "x")).unwrap_err();
        assert!(matches!(err, MedflowError::Flow(_)));
    }

    #[test]
    fn test_register_specialty() {
        let store = store();
        let specialty = SpecialtyModel {
            id: "sp-cardio".to_string(),
            code: "CARD".to_string(),
            name: "Cardiology".to_string(),
            is_active: true,
        };
        assert!(store.register_specialty(&specialty).unwrap());
        assert!(store.register_specialty(&specialty).unwrap());
        assert_eq!(store.specialties().unwrap().find("sp-cardio").unwrap().model(), specialty);
    }
}
