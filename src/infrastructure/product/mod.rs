//! Product data access: typed cache, stores and the cache-aside repository

mod cache;
mod in_memory_store;
mod postgres_store;
mod repository;

pub use cache::{ProductCache, ProductLookup, DEFAULT_PRODUCT_TTL};
pub use in_memory_store::InMemoryProductStore;
pub use postgres_store::PostgresProductStore;
pub use repository::{CachedProductRepository, PopulationMode};
