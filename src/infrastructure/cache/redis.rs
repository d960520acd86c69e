//! Redis cache client

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::retry::ConnectRetryPolicy;
use crate::domain::cache::{CacheClient, CacheLookup, CacheWrite, ConnectionState, ConnectionStateCell};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_connection_state;

/// Configuration for the Redis cache client
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Upper bound for a single GET/SET/DEL once connected
    pub operation_timeout: Duration,
    /// Connect attempts, per-attempt timeout and backoff
    pub retry: ConnectRetryPolicy,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            operation_timeout: Duration::from_millis(1000),
            retry: ConnectRetryPolicy::default(),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the steady-state operation timeout
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Sets the connect retry policy
    pub fn with_retry(mut self, retry: ConnectRetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Redis-backed [`CacheClient`].
///
/// Holds one shared connection for the whole process. Until
/// [`RedisCacheClient::connect_with_retry`] succeeds, and forever after it
/// gives up, every operation reports `Unavailable` without touching the
/// network.
pub struct RedisCacheClient {
    config: RedisCacheConfig,
    state: ConnectionStateCell,
    connection: RwLock<Option<ConnectionManager>>,
}

impl fmt::Debug for RedisCacheClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheClient")
            .field("config", &self.config)
            .field("state", &self.state.load())
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCacheClient {
    /// Creates a disconnected client
    pub fn new(config: RedisCacheConfig) -> Self {
        Self {
            config,
            state: ConnectionStateCell::new(),
            connection: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &RedisCacheConfig {
        &self.config
    }

    /// Connects using the configured retry policy
    pub async fn connect(&self) -> ConnectionState {
        self.connect_with_retry(self.config.retry.max_attempts, self.config.retry.attempt_timeout)
            .await
    }

    /// Tries to connect up to `max_attempts` times, each bounded by
    /// `attempt_timeout`, backing off exponentially in between.
    ///
    /// Never fails: after the last failed attempt the client is `Disabled`
    /// and the process carries on without a cache. Returns the resulting
    /// state.
    pub async fn connect_with_retry(
        &self,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> ConnectionState {
        if let Err(current) = self.transition(ConnectionState::Connecting) {
            debug!(state = %current, "Redis connect skipped");
            return current;
        }

        let max_attempts = max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let outcome = tokio::time::timeout(attempt_timeout, self.open_connection()).await;

            let failure = match outcome {
                Ok(Ok(connection)) => {
                    *self.connection.write().await = Some(connection);

                    return match self.transition(ConnectionState::Connected) {
                        Ok(_) => {
                            info!(url = %self.config.url, attempt, "Redis connected");
                            ConnectionState::Connected
                        }
                        // Disconnected while the attempt was in flight
                        Err(current) => {
                            self.connection.write().await.take();
                            current
                        }
                    };
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("timed out after {}ms", attempt_timeout.as_millis()),
            };

            warn!(attempt, max_attempts, error = %failure, "Redis connection attempt failed");

            if attempt == max_attempts {
                break;
            }

            tokio::time::sleep(self.config.retry.delay_for_retry(attempt - 1)).await;
        }

        self.connection.write().await.take();

        match self.transition(ConnectionState::Disabled) {
            Ok(_) => {
                error!(
                    url = %self.config.url,
                    max_attempts,
                    "Max Redis connection retries reached, continuing without cache"
                );
                ConnectionState::Disabled
            }
            Err(current) => current,
        }
    }

    async fn open_connection(&self) -> Result<ConnectionManager, DomainError> {
        let client = Client::open(self.config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))
    }

    fn transition(&self, next: ConnectionState) -> Result<ConnectionState, ConnectionState> {
        let result = self.state.transition(next);

        if result.is_ok() {
            record_connection_state(next);
        }

        result
    }

    /// A handle to the shared connection, if connected
    async fn connection(&self, op: &str, key: &str) -> Option<ConnectionManager> {
        let state = self.state.load();

        if !state.is_available() {
            debug!(op, key, state = %state, "Redis call skipped, client not connected");
            return None;
        }

        self.connection.read().await.clone()
    }

    fn ttl_secs(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[async_trait]
impl CacheClient for RedisCacheClient {
    async fn get(&self, key: &str) -> CacheLookup {
        let Some(mut conn) = self.connection("GET", key).await else {
            return CacheLookup::Unavailable;
        };

        match tokio::time::timeout(
            self.config.operation_timeout,
            conn.get::<_, Option<String>>(key),
        )
        .await
        {
            Ok(Ok(Some(value))) => CacheLookup::Hit(value),
            Ok(Ok(None)) => CacheLookup::Miss,
            Ok(Err(e)) => {
                warn!(key, error = %e, "Redis GET failed");
                CacheLookup::Unavailable
            }
            Err(_) => {
                warn!(
                    key,
                    timeout_ms = self.config.operation_timeout.as_millis() as u64,
                    "Redis GET timed out"
                );
                CacheLookup::Unavailable
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheWrite {
        let Some(mut conn) = self.connection("SET", key).await else {
            return CacheWrite::Unavailable;
        };

        match tokio::time::timeout(
            self.config.operation_timeout,
            conn.set_ex::<_, _, ()>(key, value, Self::ttl_secs(ttl)),
        )
        .await
        {
            Ok(Ok(())) => CacheWrite::Applied,
            Ok(Err(e)) => {
                warn!(key, error = %e, "Redis SET failed");
                CacheWrite::Unavailable
            }
            Err(_) => {
                warn!(
                    key,
                    timeout_ms = self.config.operation_timeout.as_millis() as u64,
                    "Redis SET timed out"
                );
                CacheWrite::Unavailable
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheWrite {
        let Some(mut conn) = self.connection("DEL", key).await else {
            return CacheWrite::Unavailable;
        };

        match tokio::time::timeout(self.config.operation_timeout, conn.del::<_, i64>(key)).await {
            Ok(Ok(_)) => CacheWrite::Applied,
            Ok(Err(e)) => {
                warn!(key, error = %e, "Redis DEL failed");
                CacheWrite::Unavailable
            }
            Err(_) => {
                warn!(
                    key,
                    timeout_ms = self.config.operation_timeout.as_millis() as u64,
                    "Redis DEL timed out"
                );
                CacheWrite::Unavailable
            }
        }
    }

    fn state(&self) -> ConnectionState {
        self.state.load()
    }

    async fn disconnect(&self) {
        let released = self.connection.write().await.take().is_some();

        match self.transition(ConnectionState::Disconnected) {
            Ok(previous) => info!(previous = %previous, released, "Redis disconnected"),
            Err(current) => debug!(state = %current, "Redis disconnect skipped"),
        }
    }
}
