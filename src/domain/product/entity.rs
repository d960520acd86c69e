//! Product entity and related types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_category, validate_description, validate_image_url, validate_name, validate_price,
    validate_tag, ProductValidationError,
};

/// Product identifier - opaque, non-empty, never reassigned
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ProductId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ProductValidationError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(ProductValidationError::EmptyId);
        }

        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plain representation of a product's public fields.
///
/// This is the shape written to the cache and the shape accepted when
/// rebuilding a product from any external source. Converting it into a
/// [`Product`] re-runs every validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductSnapshot", into = "ProductSnapshot")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: f64,
    stock: u32,
    category: String,
    is_active: bool,
    tags: Vec<String>,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new active product with no tags or images
    pub fn new(
        id: ProductId,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        price: f64,
        stock: u32,
        category: impl AsRef<str>,
    ) -> Result<Self, ProductValidationError> {
        let now = now();

        Ok(Self {
            id,
            name: validate_name(name.as_ref())?,
            description: validate_description(description.as_ref())?,
            price: validate_price(price)?,
            stock,
            category: validate_category(category.as_ref())?,
            is_active: true,
            tags: Vec::new(),
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a product from its public fields, validating every rule.
    ///
    /// Timestamps are taken as given.
    pub fn from_snapshot(snapshot: ProductSnapshot) -> Result<Self, ProductValidationError> {
        let mut tags: Vec<String> = Vec::with_capacity(snapshot.tags.len());

        for tag in &snapshot.tags {
            let tag = validate_tag(tag)?;

            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        for image in &snapshot.images {
            validate_image_url(image)?;
        }

        Ok(Self {
            id: ProductId::new(snapshot.id)?,
            name: validate_name(&snapshot.name)?,
            description: validate_description(&snapshot.description)?,
            price: validate_price(snapshot.price)?,
            stock: snapshot.stock,
            category: validate_category(&snapshot.category)?,
            is_active: snapshot.is_active,
            tags,
            images: snapshot.images,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    /// Public fields as a plain snapshot
    pub fn to_snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.as_str().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            category: self.category.clone(),
            is_active: self.is_active,
            tags: self.tags.clone(),
            images: self.images.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn update_name(&mut self, name: &str) -> Result<(), ProductValidationError> {
        self.name = validate_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: &str) -> Result<(), ProductValidationError> {
        self.description = validate_description(description)?;
        self.touch();
        Ok(())
    }

    pub fn update_price(&mut self, price: f64) -> Result<(), ProductValidationError> {
        self.price = validate_price(price)?;
        self.touch();
        Ok(())
    }

    pub fn update_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.touch();
    }

    pub fn change_category(&mut self, category: &str) -> Result<(), ProductValidationError> {
        self.category = validate_category(category)?;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    pub fn add_image(&mut self, url: &str) -> Result<(), ProductValidationError> {
        validate_image_url(url)?;
        self.images.push(url.to_string());
        self.touch();
        Ok(())
    }

    pub fn remove_image(&mut self, url: &str) {
        self.images.retain(|image| image != url);
        self.touch();
    }

    /// Replace all images; nothing changes if any URL is invalid
    pub fn set_images(&mut self, images: Vec<String>) -> Result<(), ProductValidationError> {
        for image in &images {
            validate_image_url(image)?;
        }

        self.images = images;
        self.touch();
        Ok(())
    }

    /// Adds a tag; an already present tag is left as is
    pub fn add_tag(&mut self, tag: &str) -> Result<(), ProductValidationError> {
        let tag = validate_tag(tag)?;

        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.touch();
        }

        Ok(())
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
        self.touch();
    }

    /// Replace all tags; nothing changes if any tag is invalid
    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<(), ProductValidationError> {
        let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

        for tag in &tags {
            let tag = validate_tag(tag)?;

            if !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }

        self.tags = normalized;
        self.touch();
        Ok(())
    }

    pub fn decrease_stock(&mut self, quantity: u32) -> Result<(), ProductValidationError> {
        if quantity == 0 {
            return Err(ProductValidationError::InvalidQuantity);
        }

        if quantity > self.stock {
            return Err(ProductValidationError::InsufficientStock {
                requested: quantity,
                available: self.stock,
            });
        }

        self.stock -= quantity;
        self.touch();
        Ok(())
    }

    pub fn increase_stock(&mut self, quantity: u32) -> Result<(), ProductValidationError> {
        if quantity == 0 {
            return Err(ProductValidationError::InvalidQuantity);
        }

        self.stock = self.stock.saturating_add(quantity);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = now();
    }
}

/// Current time at the microsecond precision a `TIMESTAMPTZ` column keeps
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl TryFrom<ProductSnapshot> for Product {
    type Error = ProductValidationError;

    fn try_from(snapshot: ProductSnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

impl From<Product> for ProductSnapshot {
    fn from(product: Product) -> Self {
        ProductSnapshot {
            id: product.id.into(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            is_active: product.is_active,
            tags: product.tags,
            images: product.images,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
