//! Infrastructure layer - Cache, store and service implementations

pub mod cache;
pub mod logging;
pub mod observability;
pub mod product;
pub mod services;
pub mod storage;
