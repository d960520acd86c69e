//! Cache-aside product repository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::cache::ProductCache;
use crate::domain::product::{
    PaginationParams, Product, ProductId, ProductPage, ProductRepository, ProductStore,
};
use crate::domain::DomainError;

/// How the cache is warmed after a read that missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopulationMode {
    /// Await the cache write before returning
    #[default]
    Inline,
    /// Spawn the cache write on the runtime; the read returns immediately.
    ///
    /// The spawned write carries the snapshot read from the store and is not
    /// ordered against later writes: if it lands after a concurrent
    /// `update`, the older snapshot stays cached until its TTL expires.
    Background,
}

/// [`ProductRepository`] that serves single-product reads from the cache
/// first and keeps the cache in line with every successful store write.
///
/// The store is authoritative: its failures surface as
/// [`DomainError::DataAccess`], while cache failures never do. Listings
/// always go to the store.
#[derive(Debug, Clone)]
pub struct CachedProductRepository {
    store: Arc<dyn ProductStore>,
    cache: ProductCache,
    population: PopulationMode,
}

impl CachedProductRepository {
    pub fn new(store: Arc<dyn ProductStore>, cache: ProductCache) -> Self {
        Self {
            store,
            cache,
            population: PopulationMode::default(),
        }
    }

    pub fn with_population_mode(mut self, mode: PopulationMode) -> Self {
        self.population = mode;
        self
    }

    pub fn cache(&self) -> &ProductCache {
        &self.cache
    }

    async fn populate(&self, product: &Product) {
        match self.population {
            PopulationMode::Inline => {
                self.cache.set(product).await;
            }
            PopulationMode::Background => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let cache = self.cache.clone();
                    let product = product.clone();

                    handle.spawn(async move {
                        cache.set(&product).await;
                    });
                }
                Err(_) => {
                    self.cache.set(product).await;
                }
            },
        }
    }
}

/// Logs the store failure and replaces it with the uniform data access error
fn data_access(operation: &'static str, cause: DomainError) -> DomainError {
    error!(error = %cause, "{}", operation);
    DomainError::data_access(operation)
}

#[async_trait]
impl ProductRepository for CachedProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        info!(id = %id, "Looking up product");

        if let Some(product) = self.cache.get(id).await {
            return Ok(Some(product));
        }

        let product = self
            .store
            .find_unique(id)
            .await
            .map_err(|e| data_access("Failed to find product by ID", e))?;

        let Some(product) = product else {
            debug!(id = %id, "Product not found in database");
            return Ok(None);
        };

        self.populate(&product).await;

        Ok(Some(product))
    }

    async fn find_all(&self, params: PaginationParams) -> Result<Vec<Product>, DomainError> {
        info!(page = params.page(), limit = params.limit(), "Fetching products");

        self.store
            .find_many(params.offset(), params.limit())
            .await
            .map_err(|e| data_access("Failed to fetch products", e))
    }

    async fn find_all_with_count(
        &self,
        params: PaginationParams,
    ) -> Result<ProductPage, DomainError> {
        info!(
            page = params.page(),
            limit = params.limit(),
            "Fetching products with count"
        );

        self.store
            .find_many_with_count(params.offset(), params.limit())
            .await
            .map_err(|e| data_access("Failed to fetch products with count", e))
    }

    async fn save(&self, product: &Product) -> Result<(), DomainError> {
        info!(id = %product.id(), "Saving new product");

        self.store
            .create(product)
            .await
            .map_err(|e| data_access("Failed to save product", e))?;

        self.cache.set(product).await;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), DomainError> {
        info!(id = %product.id(), "Updating product");

        self.store
            .update(product)
            .await
            .map_err(|e| data_access("Failed to update product", e))?;

        self.cache.set(product).await;
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        info!(id = %id, "Deleting product");

        self.store
            .delete(id)
            .await
            .map_err(|e| data_access("Failed to delete product", e))?;

        self.cache.delete(id).await;
        Ok(())
    }
}
