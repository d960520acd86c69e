//! Product domain - entity, validation and data access contracts

mod entity;
mod pagination;
mod repository;
mod store;
mod validation;

pub use entity::{Product, ProductId, ProductSnapshot};
pub use pagination::{PaginationParams, ProductPage, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
pub use repository::ProductRepository;
pub use store::ProductStore;
pub use validation::{ProductValidationError, MAX_DESCRIPTION_LENGTH};

#[cfg(test)]
pub use repository::mock::MockProductRepository;
#[cfg(test)]
pub use store::MockProductStore;
