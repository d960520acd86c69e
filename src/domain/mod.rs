//! Domain layer - Core entities and data access contracts

pub mod cache;
pub mod error;
pub mod product;

pub use cache::{CacheClient, CacheLookup, CacheWrite, ConnectionState, KeyNamespace};
pub use error::DomainError;
pub use product::{
    PaginationParams, Product, ProductId, ProductPage, ProductRepository, ProductStore,
    ProductValidationError,
};
