//! Cache infrastructure - Cache client implementations

mod factory;
mod in_memory;
mod redis;
mod retry;

pub use factory::{CacheBackend, CacheConfig, CacheFactory};
pub use in_memory::{InMemoryCacheClient, InMemoryCacheConfig};
pub use redis::{RedisCacheClient, RedisCacheConfig};
pub use retry::ConnectRetryPolicy;
