//! Storage infrastructure - durable store wiring

mod factory;
mod postgres;

pub use factory::{StoreBackend, StoreConfig, StoreFactory};
pub use postgres::{connect_pool, PostgresConfig};
