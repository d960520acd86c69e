//! Product cache
//!
//! Cache-aside data access for the product catalog:
//! - Redis cache client with connect retry, backoff and fail-open operations
//! - Typed product cache keyed as `product_<id>` with JSON payloads
//! - Repository that reads through the cache and writes through to it

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, Product, ProductId, ProductRepository};
pub use infrastructure::product::{CachedProductRepository, PopulationMode, ProductCache};
pub use infrastructure::services::ProductService;
