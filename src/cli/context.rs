//! Shared wiring for CLI commands

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::domain::cache::CacheClient;
use crate::domain::product::ProductStore;
use crate::infrastructure::cache::CacheFactory;
use crate::infrastructure::logging;
use crate::infrastructure::product::{CachedProductRepository, ProductCache};
use crate::infrastructure::services::ProductService;
use crate::infrastructure::storage::StoreFactory;

/// Loaded configuration with logging installed
#[derive(Debug, Clone)]
pub struct CliContext {
    config: AppConfig,
}

impl CliContext {
    /// Reads `.env` and the layered configuration, then installs logging
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::load()?;
        config.validate()?;
        logging::init_logging(&config.logging);

        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates the cache client, running the connect retry loop
    pub async fn cache(&self) -> Arc<dyn CacheClient> {
        CacheFactory::create(&self.config.cache_config()).await
    }

    /// Opens the durable store
    pub async fn store(&self) -> anyhow::Result<Arc<dyn ProductStore>> {
        Ok(StoreFactory::create(&self.config.store_config()).await?)
    }

    /// Full product stack; the cache client is returned for shutdown
    pub async fn product_service(&self) -> anyhow::Result<(ProductService, Arc<dyn CacheClient>)> {
        let store = self.store().await?;
        let cache = self.cache().await;

        let repository = CachedProductRepository::new(
            store,
            ProductCache::new(cache.clone(), self.config.cache_ttl()),
        );

        info!(cache_state = %cache.state(), "Product stack ready");

        Ok((ProductService::new(Arc::new(repository)), cache))
    }
}
