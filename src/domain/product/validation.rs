//! Product validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Maximum length for product descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Accepted product image URLs: http(s) pointing at a common raster format
static IMAGE_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://.+\.(jpg|jpeg|png|gif|webp)$").unwrap());

/// Product validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    EmptyId,
    EmptyName,
    EmptyDescription,
    DescriptionTooLong { length: usize, max: usize },
    InvalidPrice { value: f64 },
    NegativePrice { value: f64 },
    EmptyCategory,
    InvalidImageUrl { url: String },
    EmptyTag,
    InvalidQuantity,
    InsufficientStock { requested: u32, available: u32 },
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Product ID must not be empty"),
            Self::EmptyName => write!(f, "Product name must not be empty"),
            Self::EmptyDescription => write!(f, "Product description must not be empty"),
            Self::DescriptionTooLong { length, max } => {
                write!(f, "Description is too long: {} characters (max {})", length, max)
            }
            Self::InvalidPrice { value } => write!(f, "Price must be a valid number, got {}", value),
            Self::NegativePrice { value } => write!(f, "Price cannot be negative, got {}", value),
            Self::EmptyCategory => write!(f, "Category must not be empty"),
            Self::InvalidImageUrl { url } => write!(f, "Invalid image URL '{}'", url),
            Self::EmptyTag => write!(f, "Tag must not be empty"),
            Self::InvalidQuantity => write!(f, "Quantity must be a positive integer"),
            Self::InsufficientStock {
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock: requested {}, available {}",
                requested, available
            ),
        }
    }
}

impl std::error::Error for ProductValidationError {}

impl From<ProductValidationError> for DomainError {
    fn from(error: ProductValidationError) -> Self {
        DomainError::validation(error.to_string())
    }
}

/// Returns the trimmed, non-empty name
pub fn validate_name(name: &str) -> Result<String, ProductValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyName);
    }

    Ok(trimmed.to_string())
}

/// Returns the trimmed description, bounded by [`MAX_DESCRIPTION_LENGTH`]
pub fn validate_description(description: &str) -> Result<String, ProductValidationError> {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyDescription);
    }

    let length = trimmed.chars().count();

    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ProductValidationError::DescriptionTooLong {
            length,
            max: MAX_DESCRIPTION_LENGTH,
        });
    }

    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<f64, ProductValidationError> {
    if !price.is_finite() {
        return Err(ProductValidationError::InvalidPrice { value: price });
    }

    if price < 0.0 {
        return Err(ProductValidationError::NegativePrice { value: price });
    }

    Ok(price)
}

pub fn validate_category(category: &str) -> Result<String, ProductValidationError> {
    let trimmed = category.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyCategory);
    }

    Ok(trimmed.to_string())
}

pub fn validate_image_url(url: &str) -> Result<(), ProductValidationError> {
    if !IMAGE_URL_PATTERN.is_match(url) {
        return Err(ProductValidationError::InvalidImageUrl {
            url: url.to_string(),
        });
    }

    Ok(())
}

/// Returns the trimmed, non-empty tag
pub fn validate_tag(tag: &str) -> Result<String, ProductValidationError> {
    let trimmed = tag.trim();

    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyTag);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(validate_name("  Laptop ").unwrap(), "Laptop");
        assert_eq!(validate_name("   "), Err(ProductValidationError::EmptyName));
    }

    #[test]
    fn test_description_length() {
        let long = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert_eq!(
            validate_description(&long),
            Err(ProductValidationError::DescriptionTooLong {
                length: MAX_DESCRIPTION_LENGTH + 1,
                max: MAX_DESCRIPTION_LENGTH
            })
        );

        let exact = "x".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(validate_description(&exact).is_ok());
        assert_eq!(
            validate_description(""),
            Err(ProductValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(validate_price(0.0).unwrap(), 0.0);
        assert_eq!(validate_price(1999.0).unwrap(), 1999.0);
        assert!(matches!(
            validate_price(-1.0),
            Err(ProductValidationError::NegativePrice { .. })
        ));
        assert!(matches!(
            validate_price(f64::NAN),
            Err(ProductValidationError::InvalidPrice { .. })
        ));
        assert!(matches!(
            validate_price(f64::INFINITY),
            Err(ProductValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_image_urls() {
        assert!(validate_image_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_url("http://cdn.example.com/photo.JPEG").is_ok());
        assert!(validate_image_url("ftp://cdn.example.com/a.png").is_err());
        assert!(validate_image_url("https://cdn.example.com/a.svg").is_err());
        assert!(validate_image_url("not a url").is_err());
    }

    #[test]
    fn test_tag_and_category() {
        assert_eq!(validate_tag(" tech ").unwrap(), "tech");
        assert_eq!(validate_tag(""), Err(ProductValidationError::EmptyTag));
        assert_eq!(
            validate_category("\t"),
            Err(ProductValidationError::EmptyCategory)
        );
    }

    #[test]
    fn test_into_domain_error() {
        let error: DomainError = ProductValidationError::EmptyName.into();
        assert_eq!(
            error.to_string(),
            "Validation error: Product name must not be empty"
        );
    }
}
