use std::sync::Arc;

use crate::{
    Config, FlowLayoutEngine, FlowService, LayoutConfig, Result,
    store::{DbStore, MemStore, Store},
};

pub struct FlowServiceBuilder {
    config: Config,
    store: Option<Arc<Store>>,
}

impl Default for FlowServiceBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            store: None,
        }
    }
}

impl FlowServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn layout(
        mut self,
        layout: LayoutConfig,
    ) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn cache_capacity(
        mut self,
        capacity: usize,
    ) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Uses an already initialized store instead of creating one.
    pub fn store(
        mut self,
        store: Arc<Store>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(&self) -> Result<FlowService> {
        let store = match &self.store {
            Some(store) => store.clone(),
            None => {
                let store = Store::new();
                MemStore::new().init(&store)?;
                Arc::new(store)
            }
        };
        let service = FlowService::new(store, FlowLayoutEngine::new(self.config.layout.clone())?, self.config.cache_capacity);

        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlowModel, MedflowError};

    #[test]
    fn test_build_with_layout() {
        let layout = LayoutConfig {
            show_start_node: false,
            ..Default::default()
        };
        let service = FlowServiceBuilder::new().layout(layout.clone()).cache_capacity(4).build().unwrap();
        assert_eq!(service.layout_engine().config(), &layout);
    }

    #[test]
    fn test_build_rejects_invalid_spacing() {
        for step_spacing in [0.0, -180.0, f64::NAN] {
            let layout = LayoutConfig {
                step_spacing,
                ..Default::default()
            };
            let err = FlowServiceBuilder::new().layout(layout).build().err().unwrap();
            assert!(matches!(err, MedflowError::Config(_)));
        }
    }

    #[test]
    fn test_build_with_shared_store() {
        let store = Arc::new(Store::new());
        MemStore::new().init(&store).unwrap();

        let a = FlowServiceBuilder::new().store(store.clone()).build().unwrap();
        let b = FlowServiceBuilder::new().store(store).build().unwrap();
        a.deploy(&FlowModel::new("f1", "Shared")).unwrap();
        assert_eq!(b.flow("f1").unwrap().name, "Shared");
    }
}
