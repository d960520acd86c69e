//! In-memory cache client using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::cache::{CacheClient, CacheLookup, CacheWrite, ConnectionState, ConnectionStateCell};

/// Configuration for the in-memory cache client
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    expires_at: Instant,
}

/// Process-local [`CacheClient`] for development and single-node setups.
///
/// Connected from construction; per-entry TTLs are honoured on read.
#[derive(Debug)]
pub struct InMemoryCacheClient {
    cache: MokaCache<String, CacheEntry>,
    state: ConnectionStateCell,
}

impl InMemoryCacheClient {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(config.max_capacity).build(),
            state: ConnectionStateCell::connected(),
        }
    }
}

impl Default for InMemoryCacheClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheClient for InMemoryCacheClient {
    async fn get(&self, key: &str) -> CacheLookup {
        if !self.state.load().is_available() {
            return CacheLookup::Unavailable;
        }

        match self.cache.get(key).await {
            Some(entry) if entry.expires_at > Instant::now() => CacheLookup::Hit(entry.data),
            Some(_) => {
                self.cache.remove(key).await;
                CacheLookup::Miss
            }
            None => CacheLookup::Miss,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheWrite {
        if !self.state.load().is_available() {
            return CacheWrite::Unavailable;
        }

        let entry = CacheEntry {
            data: value.to_string(),
            expires_at: Instant::now() + ttl,
        };

        self.cache.insert(key.to_string(), entry).await;
        CacheWrite::Applied
    }

    async fn delete(&self, key: &str) -> CacheWrite {
        if !self.state.load().is_available() {
            return CacheWrite::Unavailable;
        }

        self.cache.remove(key).await;
        CacheWrite::Applied
    }

    fn state(&self) -> ConnectionState {
        self.state.load()
    }

    async fn disconnect(&self) {
        if self.state.transition(ConnectionState::Disconnected).is_ok() {
            self.cache.invalidate_all();
            debug!("In-memory cache released");
        }
    }
}
