//! Cache factory for runtime selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::cache::CacheClient;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCacheClient, InMemoryCacheConfig};
use super::redis::{RedisCacheClient, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Remote Redis cache
    #[default]
    Redis,
    /// Process-local cache using moka
    InMemory,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::Redis => write!(f, "redis"),
            CacheBackend::InMemory => write!(f, "in_memory"),
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "in_memory" | "inmemory" | "memory" => Ok(CacheBackend::InMemory),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: redis, in_memory",
                s
            ))),
        }
    }
}

/// Configuration for cache factory
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis: RedisCacheConfig,
    pub in_memory: InMemoryCacheConfig,
}

impl CacheConfig {
    pub fn redis(config: RedisCacheConfig) -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis: config,
            ..Default::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: CacheBackend::InMemory,
            ..Default::default()
        }
    }
}

/// Factory for creating the process-wide cache client
#[derive(Debug)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates the cache client and, for Redis, runs the connect retry loop.
    ///
    /// Always yields a usable client: a Redis client that could not connect
    /// is returned in its disabled state.
    pub async fn create(config: &CacheConfig) -> Arc<dyn CacheClient> {
        match config.backend {
            CacheBackend::Redis => {
                let client = RedisCacheClient::new(config.redis.clone());
                let state = client.connect().await;
                info!(backend = %config.backend, state = %state, "Cache client ready");
                Arc::new(client)
            }
            CacheBackend::InMemory => {
                info!(
                    backend = %config.backend,
                    max_capacity = config.in_memory.max_capacity,
                    "Cache client ready"
                );
                Arc::new(InMemoryCacheClient::with_config(config.in_memory.clone()))
            }
        }
    }
}
