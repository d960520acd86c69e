//! Product service - use cases over the product repository

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::product::{PaginationParams, Product, ProductId, ProductRepository};
use crate::domain::DomainError;

/// Request to create a new product
#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// Request to update an existing product
#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// One page of a product listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProducts {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

/// Product use cases
#[derive(Debug, Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// List one page of products with the total count
    pub async fn list(&self, params: PaginationParams) -> Result<PaginatedProducts, DomainError> {
        let page = self.repository.find_all_with_count(params).await?;
        let limit = u64::from(params.limit());

        Ok(PaginatedProducts {
            items: page.products,
            total: page.total,
            page: params.page(),
            limit: params.limit(),
            total_pages: page.total.div_ceil(limit),
        })
    }

    /// Get a product by ID
    pub async fn get(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let product_id = parse_product_id(id)?;
        self.repository.find_by_id(&product_id).await
    }

    /// Get a product by ID, returning an error if not found
    pub async fn get_required(&self, id: &str) -> Result<Product, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product '{}' not found", id)))
    }

    /// Create a product under a freshly generated ID
    pub async fn create(&self, request: CreateProductRequest) -> Result<Product, DomainError> {
        let mut product = Product::new(
            ProductId::generate(),
            &request.name,
            &request.description,
            request.price,
            request.stock,
            &request.category,
        )?;

        product.set_tags(request.tags)?;
        product.set_images(request.images)?;

        self.repository.save(&product).await?;
        info!(id = %product.id(), "Product created");

        Ok(product)
    }

    /// Apply the provided fields to an existing product
    pub async fn update(
        &self,
        id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, DomainError> {
        let mut product = self.get_required(id).await?;

        if let Some(name) = request.name {
            product.update_name(&name)?;
        }

        if let Some(description) = request.description {
            product.update_description(&description)?;
        }

        if let Some(price) = request.price {
            product.update_price(price)?;
        }

        if let Some(stock) = request.stock {
            product.update_stock(stock);
        }

        if let Some(category) = request.category {
            product.change_category(&category)?;
        }

        match request.is_active {
            Some(true) => product.activate(),
            Some(false) => product.deactivate(),
            None => {}
        }

        if let Some(tags) = request.tags {
            product.set_tags(tags)?;
        }

        if let Some(images) = request.images {
            product.set_images(images)?;
        }

        self.repository.update(&product).await?;
        Ok(product)
    }

    /// Delete a product; deleting an unknown product is an error
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let product = self.get_required(id).await?;
        self.repository.delete(product.id()).await
    }

    /// Add (positive delta) or remove (negative delta) stock
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> Result<Product, DomainError> {
        let mut product = self.get_required(id).await?;
        let quantity = u32::try_from(delta.unsigned_abs())
            .map_err(|_| DomainError::validation(format!("Stock delta out of range: {}", delta)))?;

        if delta >= 0 {
            product.increase_stock(quantity)?;
        } else {
            product.decrease_stock(quantity)?;
        }

        self.repository.update(&product).await?;
        Ok(product)
    }
}

fn parse_product_id(id: &str) -> Result<ProductId, DomainError> {
    ProductId::new(id).map_err(DomainError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::MockProductRepository;

    fn laptop() -> Product {
        Product::new(ProductId::new("1").unwrap(), "Laptop", "Gaming", 1999.0, 10, "Tech")
            .unwrap()
    }

    async fn service_with_laptop() -> (ProductService, Arc<MockProductRepository>) {
        let repository = Arc::new(MockProductRepository::new().with_product(laptop()).await);
        (ProductService::new(repository.clone()), repository)
    }

    fn create_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Keyboard".to_string(),
            description: "Mechanical".to_string(),
            price: 120.0,
            stock: 3,
            category: "Peripherals".to_string(),
            tags: vec!["gamer".to_string(), " gamer ".to_string()],
            images: vec!["https://cdn.example.com/kb.png".to_string()],
        }
    }

    #[tokio::test]
    async fn test_get_and_get_required() {
        let (service, _) = service_with_laptop().await;

        assert!(service.get("1").await.unwrap().is_some());
        assert!(service.get("2").await.unwrap().is_none());
        assert!(service.get_required("2").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_rejects_blank_id() {
        let (service, _) = service_with_laptop().await;

        let err = service.get("  ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let (service, repository) = service_with_laptop().await;

        let created = service.create(create_request()).await.unwrap();

        assert_ne!(created.id().as_str(), "1");
        assert_eq!(created.tags().len(), 1);
        let stored = repository.find_by_id(created.id()).await.unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn test_create_invalid_is_rejected() {
        let (service, _) = service_with_laptop().await;
        let mut request = create_request();
        request.price = -1.0;

        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let (service, _) = service_with_laptop().await;
        let before = service.get_required("1").await.unwrap();

        let updated = service
            .update(
                "1",
                UpdateProductRequest {
                    price: Some(1499.0),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price(), 1499.0);
        assert!(!updated.is_active());
        assert_eq!(updated.created_at(), before.created_at());
        assert!(updated.updated_at() >= before.updated_at());
        assert_eq!(service.get_required("1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (service, _) = service_with_laptop().await;

        let err = service
            .update("missing", UpdateProductRequest::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, _) = service_with_laptop().await;

        service.delete("1").await.unwrap();
        assert!(service.get("1").await.unwrap().is_none());
        assert!(service.delete("1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let (service, _) = service_with_laptop().await;

        assert_eq!(service.adjust_stock("1", 5).await.unwrap().stock(), 15);
        assert_eq!(service.adjust_stock("1", -15).await.unwrap().stock(), 0);

        let err = service.adjust_stock("1", -1).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_reports_total_pages() {
        let repository = MockProductRepository::new();
        for i in 0..25 {
            let product = Product::new(
                ProductId::new(format!("p{:02}", i)).unwrap(),
                "Item",
                "Thing",
                1.0,
                1,
                "Misc",
            )
            .unwrap();
            repository.save(&product).await.unwrap();
        }
        let service = ProductService::new(Arc::new(repository));

        let page = service
            .list(PaginationParams::new(3, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let (service, repository) = service_with_laptop().await;
        repository.set_should_fail(true).await;

        assert!(service.get("1").await.unwrap_err().is_data_access());
    }
}
