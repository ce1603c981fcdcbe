//! 站点注册表

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::SiteConfig;
use crate::interfaces::Source;

pub mod batoto;
pub mod crunchyroll;

type SourceFactory = Box<dyn Fn(SiteConfig) -> Arc<dyn Source> + Send + Sync>;

pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("batoto", |cfg| Arc::new(batoto::Batoto::new(cfg)));
        registry.register("crunchyroll", |cfg| Arc::new(crunchyroll::Crunchyroll::new(cfg)));
        registry
    }

    pub fn register<F>(&mut self, id: &str, factory: F)
    where
        F: Fn(SiteConfig) -> Arc<dyn Source> + Send + Sync + 'static,
    {
        self.factories.insert(id.to_string(), Box::new(factory));
    }

    pub fn create(&self, id: &str, config: SiteConfig) -> Option<Arc<dyn Source>> {
        self.factories.get(id).map(|f| f(config))
    }

    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
