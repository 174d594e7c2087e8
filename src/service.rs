//! Flow service - the main entry point for Medflow.
//!
//! The service ties the storage layer, the layout engine and a diagram cache
//! together:
//! - Deploying flow definitions and specialties
//! - Looking up and filtering flows
//! - Laying flows out as diagrams
//! - Comparing flows and computing statistics

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    Config, Diagram, FlowLayoutEngine, FlowModel, FlowOrigin, MedflowError, Result, SpecialtyModel, StoreType,
    common::MemCache,
    cost::FlowComparison,
    store::{
        DbStore, MemStore, PageData, Store,
        data::Flow,
        query::{FlowFilter, Query, SpecialtyFilter},
    },
};

/// A laid-out diagram and the record revision it was built from.
#[derive(Clone)]
struct CachedDiagram {
    revision: u64,
    diagram: Arc<Diagram>,
}

/// Aggregate figures over everything in the store.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FlowStatistics {
    pub total_specialties: usize,
    pub total_flows: usize,
    pub total_steps: usize,
    pub total_links: usize,
    /// mean effective duration of a flow, in minutes
    pub average_flow_duration: f64,
    /// mean effective cost of a flow
    pub average_flow_cost: f64,
}

/// The flow service.
///
/// # Example
///
/// ```rust
/// use medflow::{FlowModel, FlowServiceBuilder, StepModel};
///
/// let service = FlowServiceBuilder::new().build().unwrap();
/// let flow = FlowModel::new("flow-1", "General Checkup").with_step(StepModel::new("consult", "st-cons", "Consult"));
/// service.deploy(&flow).unwrap();
///
/// let diagram = service.diagram("flow-1").unwrap();
/// assert_eq!(diagram.nodes().len(), 3);
/// ```
pub struct FlowService {
    /// Storage for flows and specialties.
    store: Arc<Store>,
    layout: FlowLayoutEngine,
    /// Laid-out diagrams by flow id.
    diagrams: Arc<MemCache<String, CachedDiagram>>,
}

impl FlowService {
    /// Creates a service with the given configuration and a fresh store.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let store = Store::new();
        let db: Box<dyn DbStore> = match config.store.store_type {
            StoreType::Mem => Box::new(MemStore::new()),
        };
        db.init(&store)?;

        Ok(Self::new(Arc::new(store), FlowLayoutEngine::new(config.layout)?, config.cache_capacity))
    }

    pub(crate) fn new(
        store: Arc<Store>,
        layout: FlowLayoutEngine,
        cache_capacity: usize,
    ) -> Self {
        Self {
            store,
            layout,
            diagrams: Arc::new(MemCache::new(cache_capacity)),
        }
    }

    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    pub fn layout_engine(&self) -> &FlowLayoutEngine {
        &self.layout
    }

    /// Stores a flow, replacing any previous version with the same id.
    pub fn deploy(
        &self,
        flow: &FlowModel,
    ) -> Result<bool> {
        let ret = self.store.deploy(flow)?;
        self.diagrams.remove(&flow.id);
        debug!("deployed flow {} ({} steps)", flow.id, flow.nodes.len());
        Ok(ret)
    }

    /// Removes a flow and its cached diagram.
    pub fn remove(
        &self,
        id: &str,
    ) -> Result<bool> {
        let ret = self.store.flows()?.delete(id)?;
        self.diagrams.remove(&id.to_string());
        Ok(ret)
    }

    pub fn register_specialty(
        &self,
        specialty: &SpecialtyModel,
    ) -> Result<bool> {
        self.store.register_specialty(specialty)
    }

    pub fn flow(
        &self,
        id: &str,
    ) -> Result<FlowModel> {
        self.store.flows()?.find(id)?.model()
    }

    pub fn flows(
        &self,
        query: &Query<FlowFilter>,
    ) -> Result<PageData<FlowModel>> {
        self.store.flows()?.query(query)?.try_map(|row| row.model())
    }

    /// All specialties, ordered by name.
    pub fn specialties(&self) -> Result<Vec<SpecialtyModel>> {
        let page = self.store.specialties()?.query(&Query::<SpecialtyFilter>::new())?;
        Ok(page.rows.iter().map(|row| row.model()).collect())
    }

    /// Lays out a stored flow.
    ///
    /// Diagrams are cached per flow and served only while they match the
    /// stored record's revision, so a redeploy racing with a read never
    /// leaves an outdated diagram behind.
    pub fn diagram(
        &self,
        id: &str,
    ) -> Result<Arc<Diagram>> {
        let record = self.store.flows()?.find(id)?;
        let cached = self
            .diagrams
            .try_get_with(id.to_string(), || self.lay_out(&record))
            .map_err(|e| (*e).clone())?;
        if cached.revision == record.revision {
            return Ok(cached.diagram);
        }

        trace!("diagram({}): cached revision {} is stale, now {}", id, cached.revision, record.revision);
        let fresh = self.lay_out(&record)?;
        self.diagrams.set(id.to_string(), fresh.clone());
        Ok(fresh.diagram)
    }

    fn lay_out(
        &self,
        record: &Flow,
    ) -> Result<CachedDiagram> {
        trace!("diagram cache miss: {}@{}", record.id, record.revision);
        Ok(CachedDiagram {
            revision: record.revision,
            diagram: Arc::new(self.layout.layout(&record.model()?)),
        })
    }

    /// Compares two stored flows.
    pub fn compare(
        &self,
        ideal_id: &str,
        real_id: &str,
    ) -> Result<FlowComparison> {
        let ideal = self.flow(ideal_id)?;
        let real = self.flow(real_id)?;
        Ok(FlowComparison::compare(&ideal, &real))
    }

    /// Compares the ideal flow of a specialty against another of its flows.
    ///
    /// `specialty` is matched against specialty ids, codes and names. The
    /// ideal flow is the first authored flow; the real one is the first other
    /// flow, preferring generated ones. Returns `None` when the specialty has
    /// fewer than two flows.
    pub fn compare_specialty(
        &self,
        specialty: &str,
    ) -> Result<Option<FlowComparison>> {
        let specialty = self.resolve_specialty(specialty)?;
        let flows: Vec<FlowModel> = self
            .flows(&Query::new())?
            .rows
            .into_iter()
            .filter(|f| specialty.matches(f.specialty_id.as_deref(), f.specialty_name.as_deref()))
            .collect();
        trace!("compare_specialty({}): {} flows", specialty.id, flows.len());

        let ideal_idx = match flows.iter().position(|f| f.origin == FlowOrigin::Authored) {
            Some(idx) => idx,
            None if !flows.is_empty() => 0,
            None => return Ok(None),
        };
        let others: Vec<&FlowModel> = flows.iter().enumerate().filter(|(idx, _)| *idx != ideal_idx).map(|(_, f)| f).collect();
        let Some(real) = others.iter().find(|f| f.origin == FlowOrigin::Generated).or(others.first()) else {
            return Ok(None);
        };

        Ok(Some(FlowComparison::compare(&flows[ideal_idx], real)))
    }

    fn resolve_specialty(
        &self,
        key: &str,
    ) -> Result<SpecialtyModel> {
        let key = key.trim();
        if key.is_empty() {
            return Err(MedflowError::Flow("missing specialty".into()));
        }
        let found = self.specialties()?.into_iter().find(|s| s.matches(Some(key), Some(key)));
        Ok(found.unwrap_or_else(|| SpecialtyModel {
            id: key.to_string(),
            code: String::new(),
            name: key.to_string(),
            is_active: true,
        }))
    }

    pub fn statistics(&self) -> Result<FlowStatistics> {
        let flows = self.store.flows()?.query(&Query::new())?.rows;
        let total_specialties = self.store.specialties()?.query(&Query::new())?.count;

        let total_flows = flows.len();
        let mean = |sum: f64| if total_flows == 0 { 0.0 } else { sum / total_flows as f64 };

        Ok(FlowStatistics {
            total_specialties,
            total_flows,
            total_steps: flows.iter().map(|f| f.step_count).sum(),
            total_links: flows.iter().map(|f| f.link_count).sum(),
            average_flow_duration: mean(flows.iter().map(|f| f.average_duration).sum()),
            average_flow_cost: mean(flows.iter().map(|f| f.estimated_cost).sum()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlowServiceBuilder, NodeKind, StepLink, StepModel};

    fn service() -> FlowService {
        FlowServiceBuilder::new().build().unwrap()
    }

    fn step(
        id: &str,
        label: &str,
        order_index: i64,
        duration: f64,
        cost: f64,
    ) -> StepModel {
        let mut step = StepModel::new(id, "st-cons", label);
        step.order_index = Some(order_index);
        step.duration_minutes = Some(duration);
        step.cost_avg = Some(cost);
        step
    }

    fn cardiology() -> SpecialtyModel {
        SpecialtyModel {
            id: "sp-cardio".to_string(),
            code: "CARD".to_string(),
            name: "Cardiology".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_deploy_and_find() {
        let service = service();
        let flow = FlowModel::new("flow-1", "Chest pain").with_step(step("a", "Triage", 0, 10.0, 25.0));
        assert!(service.deploy(&flow).unwrap());
        assert_eq!(service.flow("flow-1").unwrap(), flow);

        let err = service.flow("missing").unwrap_err();
        assert!(matches!(err, MedflowError::NotFound { .. }));
    }

    #[test]
    fn test_diagram_is_cached_until_redeploy() {
        let service = service();
        let mut flow = FlowModel::new("flow-1", "Chest pain").with_step(step("a", "Triage", 0, 10.0, 25.0));
        service.deploy(&flow).unwrap();

        let first = service.diagram("flow-1").unwrap();
        let second = service.diagram("flow-1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.nodes().len(), 3);

        flow = flow.with_step(step("b", "ECG", 1, 10.0, 30.0));
        service.deploy(&flow).unwrap();
        let third = service.diagram("flow-1").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.nodes().len(), 4);
    }

    #[test]
    fn test_diagram_ignores_entry_from_older_revision() {
        let service = service();
        let flow = FlowModel::new("flow-1", "Chest pain").with_step(step("a", "Triage", 0, 10.0, 25.0));
        service.deploy(&flow).unwrap();
        let old = service.diagram("flow-1").unwrap();

        // a write that lands without going through the service's invalidation,
        // as when a reader re-caches just after a concurrent deploy removed the entry
        let updated = flow.with_step(step("b", "ECG", 1, 10.0, 30.0));
        service.store().deploy(&updated).unwrap();

        let fresh = service.diagram("flow-1").unwrap();
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert_eq!(fresh.path(), vec!["start", "a", "b", "end"]);
        assert!(Arc::ptr_eq(&fresh, &service.diagram("flow-1").unwrap()));
    }

    #[test]
    fn test_diagram_under_concurrent_deploys() {
        let service = service();
        let version = |n: usize| {
            let mut flow = FlowModel::new("flow-1", "Chest pain");
            for i in 0..n {
                flow = flow.with_step(step(&format!("s{}", i), "Step", i as i64, 10.0, 25.0));
            }
            flow
        };
        service.deploy(&version(1)).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for n in 2..=20 {
                    service.deploy(&version(n)).unwrap();
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        service.diagram("flow-1").unwrap();
                    }
                });
            }
        });

        // once writers are done, the diagram always reflects the last deploy
        assert_eq!(service.diagram("flow-1").unwrap().nodes().len(), 22);
    }

    #[test]
    fn test_diagram_of_missing_flow() {
        let err = service().diagram("nope").unwrap_err();
        assert_eq!(err.to_string(), "flows 'nope' not found");
    }

    #[test]
    fn test_remove_invalidates_diagram() {
        let service = service();
        service.deploy(&FlowModel::new("flow-1", "x")).unwrap();
        assert_eq!(service.diagram("flow-1").unwrap().nodes()[0].kind(), NodeKind::Placeholder);
        assert!(service.remove("flow-1").unwrap());
        assert!(service.diagram("flow-1").is_err());
    }

    #[test]
    fn test_flows_query() {
        let service = service();
        for (id, name, sid) in [("f1", "Chest pain", "sp-cardio"), ("f2", "Arrhythmia", "sp-cardio"), ("f3", "Acne", "sp-derma")] {
            service.deploy(&FlowModel::new(id, name).with_specialty(Some(sid), None)).unwrap();
        }

        let page = service.flows(&Query::new().with_filter(FlowFilter::default().specialty("sp-cardio"))).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.rows.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(), vec!["f2", "f1"]);

        let page = service.flows(&Query::new().with_page(2, 2)).unwrap();
        assert_eq!(page.page_count, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "f1");
    }

    #[test]
    fn test_compare_specialty() {
        let service = service();
        service.register_specialty(&cardiology()).unwrap();

        let ideal = FlowModel::new("flow-ideal", "Ideal chest pain")
            .with_specialty(Some("sp-cardio"), Some("Cardiology"))
            .with_step(step("a", "Triage", 0, 10.0, 25.0))
            .with_step(step("b", "ECG", 1, 10.0, 30.0));
        let real = FlowModel::new("bm-1", "Observed chest pain")
            .with_specialty(None, Some("cardiology"))
            .with_origin(FlowOrigin::Generated)
            .with_step(step("x", "Triage", 0, 15.0, 25.0));
        service.deploy(&ideal).unwrap();
        service.deploy(&real).unwrap();

        for key in ["sp-cardio", "CARD", "CARDIOLOGY"] {
            let cmp = service.compare_specialty(key).unwrap().unwrap();
            assert_eq!(cmp.ideal.flow_id, "flow-ideal");
            assert_eq!(cmp.real.flow_id, "bm-1");
            assert_eq!(cmp.differences.removed_steps, vec!["ECG"]);
            assert_eq!(cmp.differences.duration_difference, -5.0);
        }

        assert!(service.compare_specialty("sp-derma").unwrap().is_none());
        assert!(service.compare_specialty("  ").is_err());
    }

    #[test]
    fn test_compare_specialty_single_flow() {
        let service = service();
        service.deploy(&FlowModel::new("f1", "Only").with_specialty(Some("sp-cardio"), None)).unwrap();
        assert!(service.compare_specialty("sp-cardio").unwrap().is_none());
    }

    #[test]
    fn test_compare_by_id() {
        let service = service();
        service.deploy(&FlowModel::new("a", "A").with_step(step("s", "Consult", 0, 30.0, 100.0))).unwrap();
        service.deploy(&FlowModel::new("b", "B").with_step(step("s", "Consult", 0, 30.0, 100.0))).unwrap();
        assert!(service.compare("a", "b").unwrap().is_on_track());
        assert!(service.compare("a", "zzz").is_err());
    }

    #[test]
    fn test_statistics() {
        let service = service();
        assert_eq!(service.statistics().unwrap(), FlowStatistics::default());

        service.register_specialty(&cardiology()).unwrap();
        let mut first = FlowModel::new("f1", "One").with_step(step("a", "A", 0, 30.0, 100.0)).with_step(step("b", "B", 1, 30.0, 100.0));
        first.edges.push(StepLink {
            id: "l1".to_string(),
            source_node_id: "a".to_string(),
            target_node_id: "b".to_string(),
            ..Default::default()
        });
        let mut second = FlowModel::new("f2", "Two");
        second.average_duration = Some(120.0);
        second.estimated_cost = Some(400.0);
        service.deploy(&first).unwrap();
        service.deploy(&second).unwrap();

        let stats = service.statistics().unwrap();
        assert_eq!(stats.total_specialties, 1);
        assert_eq!(stats.total_flows, 2);
        assert_eq!(stats.total_steps, 2);
        assert_eq!(stats.total_links, 1);
        assert_eq!(stats.average_flow_duration, 90.0);
        assert_eq!(stats.average_flow_cost, 300.0);
        assert_eq!(service.specialties().unwrap(), vec![cardiology()]);
    }
}
