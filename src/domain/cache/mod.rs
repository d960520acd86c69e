//! Cache domain - remote cache abstraction and connection lifecycle

mod client;
mod key;
mod state;

pub use client::{CacheClient, CacheLookup, CacheWrite};
pub use key::KeyNamespace;
pub use state::{ConnectionState, ConnectionStateCell};

#[cfg(test)]
pub use client::mock::{CacheCall, MockCacheClient};
