//! Coordinator fixture for integration tests

use super::scripted_executor::ScriptedExecutor;
use graphcache::{CacheConfig, CacheCoordinator, MemoryCacheStore};
use std::sync::Arc;

pub struct TestFixture {
    pub coordinator: Arc<CacheCoordinator>,
    pub store: Arc<MemoryCacheStore>,
    pub executor: Arc<ScriptedExecutor>,
}

impl TestFixture {
    /// Fixture whose writes resolve after invalidation completes
    pub fn new() -> Self {
        Self::with_config(CacheConfig {
            await_invalidation: true,
            ..CacheConfig::default()
        })
    }

    pub fn with_config(config: CacheConfig) -> Self {
        init_logging();
        let executor = ScriptedExecutor::new();
        let (coordinator, store) = CacheCoordinator::with_memory_store(config, executor.clone())
            .expect("Failed to create coordinator");
        Self {
            coordinator: Arc::new(coordinator),
            store,
            executor,
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
