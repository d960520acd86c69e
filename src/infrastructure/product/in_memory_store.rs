//! In-memory product store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::product::{Product, ProductId, ProductPage, ProductStore};
use crate::domain::DomainError;

/// Process-local [`ProductStore`] for development and tests
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in listing order
    fn ordered(products: &HashMap<ProductId, Product>) -> Vec<&Product> {
        let mut rows: Vec<&Product> = products.values().collect();
        rows.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        rows
    }

    fn page(products: &HashMap<ProductId, Product>, skip: u64, take: u32) -> Vec<Product> {
        Self::ordered(products)
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(take as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_unique(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Product>, DomainError> {
        Ok(Self::page(&*self.products.read().await, skip, take))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.products.read().await.len() as u64)
    }

    async fn find_many_with_count(
        &self,
        skip: u64,
        take: u32,
    ) -> Result<ProductPage, DomainError> {
        let products = self.products.read().await;

        Ok(ProductPage {
            products: Self::page(&products, skip, take),
            total: products.len() as u64,
        })
    }

    async fn create(&self, product: &Product) -> Result<(), DomainError> {
        let mut products = self.products.write().await;

        if products.contains_key(product.id()) {
            return Err(DomainError::storage(format!(
                "Product '{}' already exists",
                product.id()
            )));
        }

        products.insert(product.id().clone(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), DomainError> {
        let mut products = self.products.write().await;

        match products.get_mut(product.id()) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            ))),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        match self.products.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(format!("Product '{}' not found", id))),
        }
    }
}
