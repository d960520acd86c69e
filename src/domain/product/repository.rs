//! Product repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Product, ProductId};
use super::pagination::{PaginationParams, ProductPage};
use crate::domain::DomainError;

/// Entry point for product data access.
///
/// Implementations only ever fail with errors coming from the durable
/// store; cache trouble never reaches the caller.
#[async_trait]
pub trait ProductRepository: Send + Sync + Debug {
    /// Find a product by ID
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// List one page of products
    async fn find_all(&self, params: PaginationParams) -> Result<Vec<Product>, DomainError>;

    /// List one page of products together with the total count
    async fn find_all_with_count(
        &self,
        params: PaginationParams,
    ) -> Result<ProductPage, DomainError>;

    /// Persist a new product
    async fn save(&self, product: &Product) -> Result<(), DomainError>;

    /// Overwrite an existing product
    async fn update(&self, product: &Product) -> Result<(), DomainError>;

    /// Delete a product by ID
    async fn delete(&self, id: &ProductId) -> Result<(), DomainError>;
}
