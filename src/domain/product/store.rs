//! Durable product store trait

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{Product, ProductId};
use super::pagination::ProductPage;
use crate::domain::DomainError;

/// Authoritative store for products.
///
/// Implementations report failures as [`DomainError::Storage`]; the
/// repository is responsible for turning those into its own error kind.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductStore: Send + Sync + Debug {
    /// Fetch a single product row
    async fn find_unique(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Fetch `take` rows after skipping `skip`, in a stable order
    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Product>, DomainError>;

    /// Total number of product rows
    async fn count(&self) -> Result<u64, DomainError>;

    /// Fetch a page and the total count from the same snapshot
    async fn find_many_with_count(&self, skip: u64, take: u32)
        -> Result<ProductPage, DomainError>;

    /// Insert a new row
    async fn create(&self, product: &Product) -> Result<(), DomainError>;

    /// Overwrite the row keyed by `product.id()`
    async fn update(&self, product: &Product) -> Result<(), DomainError>;

    /// Remove the row keyed by `id`
    async fn delete(&self, id: &ProductId) -> Result<(), DomainError>;
}

