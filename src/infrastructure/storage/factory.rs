//! Store factory for runtime backend selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::product::ProductStore;
use crate::domain::DomainError;
use crate::infrastructure::product::{InMemoryProductStore, PostgresProductStore};

use super::postgres::{connect_pool, PostgresConfig};

/// Supported durable store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// PostgreSQL
    #[default]
    Postgres,
    /// Process-local store (for testing/development)
    InMemory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::InMemory => write!(f, "in_memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(StoreBackend::InMemory),
            _ => Err(DomainError::configuration(format!(
                "Unknown store backend: {}. Valid backends: postgres, in_memory",
                s
            ))),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StoreConfig {
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::InMemory => StoreBackend::InMemory,
            Self::Postgres(_) => StoreBackend::Postgres,
        }
    }
}

/// Factory for creating the product store
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates the store; a Postgres store gets its table created if missing
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn ProductStore>, DomainError> {
        info!(backend = %config.backend(), "Creating product store");

        match config {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryProductStore::new())),
            StoreConfig::Postgres(pg_config) => {
                let store = PostgresProductStore::new(connect_pool(pg_config).await?);
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }
}
