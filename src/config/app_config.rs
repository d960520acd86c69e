use std::time::Duration;

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::cache::{
    CacheBackend, CacheConfig, ConnectRetryPolicy, InMemoryCacheConfig, RedisCacheConfig,
};
use crate::infrastructure::storage::{PostgresConfig, StoreBackend, StoreConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Remote cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub url: String,
    /// Time-to-live of product entries
    pub ttl_secs: u64,
    /// Connection attempts before the cache is disabled
    pub connect_retries: u32,
    pub connect_timeout_ms: u64,
    pub backoff_base_ms: u64,
    pub operation_timeout_ms: u64,
    /// Entry limit for the in-memory backend
    pub max_capacity: u64,
}

/// Durable store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: "redis://127.0.0.1:6379".to_string(),
            ttl_secs: 3600,
            connect_retries: 3,
            connect_timeout_ms: 5000,
            backoff_base_ms: 1000,
            operation_timeout_ms: 1000,
            max_capacity: 10_000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let postgres = PostgresConfig::default();

        Self {
            backend: StoreBackend::default(),
            url: postgres.url,
            max_connections: postgres.max_connections,
            connect_timeout_secs: postgres.connect_timeout_secs,
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/local` and `APP__*` environment
    /// variables, in increasing precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Rejects settings the data access layer cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        let checks = [
            (self.cache.ttl_secs == 0, "cache.ttl_secs must be greater than 0"),
            (self.cache.connect_retries == 0, "cache.connect_retries must be greater than 0"),
            (self.cache.connect_timeout_ms == 0, "cache.connect_timeout_ms must be greater than 0"),
            (
                self.cache.operation_timeout_ms == 0,
                "cache.operation_timeout_ms must be greater than 0",
            ),
            (self.cache.max_capacity == 0, "cache.max_capacity must be greater than 0"),
            (self.cache.url.trim().is_empty(), "cache.url must not be empty"),
            (
                self.database.max_connections == 0,
                "database.max_connections must be greater than 0",
            ),
            (
                self.database.connect_timeout_secs == 0,
                "database.connect_timeout_secs must be greater than 0",
            ),
            (self.database.url.trim().is_empty(), "database.url must not be empty"),
        ];

        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(DomainError::configuration(*message)),
            None => Ok(()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn cache_config(&self) -> CacheConfig {
        let settings = &self.cache;
        let retry = ConnectRetryPolicy::new(
            settings.connect_retries,
            Duration::from_millis(settings.connect_timeout_ms),
        )
        .with_base_delay(Duration::from_millis(settings.backoff_base_ms));

        CacheConfig {
            backend: settings.backend,
            redis: RedisCacheConfig::new(settings.url.clone())
                .with_operation_timeout(Duration::from_millis(settings.operation_timeout_ms))
                .with_retry(retry),
            in_memory: InMemoryCacheConfig::default().with_max_capacity(settings.max_capacity),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        match self.database.backend {
            StoreBackend::InMemory => StoreConfig::InMemory,
            StoreBackend::Postgres => StoreConfig::Postgres(
                PostgresConfig::new(self.database.url.clone())
                    .with_max_connections(self.database.max_connections)
                    .with_connect_timeout(self.database.connect_timeout_secs),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::from_builder(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.cache.connect_retries, 3);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.database.backend, StoreBackend::Postgres);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [cache]
            url = "redis://cache:6379"
            ttl_secs = 60

            [database]
            backend = "in_memory"
            "#,
        );

        assert_eq!(config.cache.url, "redis://cache:6379");
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cache.operation_timeout_ms, 1000);
        assert!(matches!(config.store_config(), StoreConfig::InMemory));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = AppConfig::default();
        config.cache.connect_retries = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("connect_retries"));

        let mut config = AppConfig::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_config_carries_retry_settings() {
        let config = from_toml(
            r#"
            [cache]
            connect_retries = 5
            connect_timeout_ms = 250
            backoff_base_ms = 10
            operation_timeout_ms = 300
            "#,
        );

        let cache = config.cache_config();
        assert_eq!(cache.backend, CacheBackend::Redis);
        assert_eq!(cache.redis.retry.max_attempts, 5);
        assert_eq!(cache.redis.retry.attempt_timeout, Duration::from_millis(250));
        assert_eq!(cache.redis.retry.base_delay, Duration::from_millis(10));
        assert_eq!(cache.redis.operation_timeout, Duration::from_millis(300));
    }

    #[test]
    fn test_store_config_postgres() {
        let config = AppConfig::default();

        match config.store_config() {
            StoreConfig::Postgres(pg) => {
                assert_eq!(pg.max_connections, 10);
                assert_eq!(pg.connect_timeout_secs, 30);
            }
            StoreConfig::InMemory => panic!("expected postgres store"),
        }
    }
}
