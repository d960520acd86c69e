//! Typed product cache over the raw cache client

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{CacheClient, CacheLookup, CacheWrite, KeyNamespace};
use crate::domain::product::{Product, ProductId};
use crate::infrastructure::observability::{record_cache_lookup, record_cache_write, LookupOutcome};

/// Default time-to-live for product entries
pub const DEFAULT_PRODUCT_TTL: Duration = Duration::from_secs(3600);

/// Three-way result of a product cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ProductLookup {
    Hit(Product),
    /// Absent, expired, or present but unparseable
    Miss,
    Unavailable,
}

impl ProductLookup {
    pub fn into_product(self) -> Option<Product> {
        match self {
            Self::Hit(product) => Some(product),
            Self::Miss | Self::Unavailable => None,
        }
    }
}

/// Product entries in the remote cache, stored as JSON under `product_<id>`.
///
/// Nothing here returns an error: cache trouble is logged and turned into
/// a miss or a no-op.
#[derive(Clone)]
pub struct ProductCache {
    client: Arc<dyn CacheClient>,
    namespace: KeyNamespace,
    ttl: Duration,
}

impl fmt::Debug for ProductCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductCache")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .field("state", &self.client.state())
            .finish()
    }
}

impl ProductCache {
    pub fn new(client: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self {
            client,
            namespace: KeyNamespace::product(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn client(&self) -> &Arc<dyn CacheClient> {
        &self.client
    }

    pub fn build_key(&self, id: &ProductId) -> String {
        self.namespace.key(id.as_str())
    }

    /// Looks a product up, keeping the hit/miss/unavailable distinction
    pub async fn lookup(&self, id: &ProductId) -> ProductLookup {
        let key = self.build_key(id);
        let (lookup, outcome) = match self.client.get(&key).await {
            CacheLookup::Hit(data) => match serde_json::from_str::<Product>(&data) {
                Ok(product) => (ProductLookup::Hit(product), LookupOutcome::Hit),
                Err(e) => {
                    warn!(id = %id, key = %key, error = %e, "Discarding unparseable cached product");
                    (ProductLookup::Miss, LookupOutcome::Corrupt)
                }
            },
            CacheLookup::Miss => (ProductLookup::Miss, LookupOutcome::Miss),
            CacheLookup::Unavailable => (ProductLookup::Unavailable, LookupOutcome::Unavailable),
        };

        debug!(id = %id, outcome = outcome.as_str(), "Product cache lookup");
        record_cache_lookup(self.namespace.prefix(), outcome);

        lookup
    }

    /// Cached product, if any
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.lookup(id).await.into_product()
    }

    /// Writes the product with the configured TTL
    pub async fn set(&self, product: &Product) -> CacheWrite {
        let data = match serde_json::to_string(product) {
            Ok(data) => data,
            Err(e) => {
                warn!(id = %product.id(), error = %e, "Failed to serialize product for cache");
                return CacheWrite::Unavailable;
            }
        };

        let key = self.build_key(product.id());
        let outcome = self.client.set(&key, &data, self.ttl).await;

        match outcome {
            CacheWrite::Applied => {
                debug!(id = %product.id(), ttl_secs = self.ttl.as_secs(), "Product cached")
            }
            CacheWrite::Unavailable => {
                debug!(id = %product.id(), "Product not cached, cache unavailable")
            }
        }

        record_cache_write(self.namespace.prefix(), "set", outcome);
        outcome
    }

    /// Removes the product entry, present or not
    pub async fn delete(&self, id: &ProductId) -> CacheWrite {
        let key = self.build_key(id);
        let outcome = self.client.delete(&key).await;

        if outcome.is_applied() {
            debug!(id = %id, "Product removed from cache");
        }

        record_cache_write(self.namespace.prefix(), "delete", outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheCall, MockCacheClient};

    fn laptop() -> Product {
        let mut product = Product::new(
            ProductId::new("p123").unwrap(),
            "Laptop",
            "Gaming",
            1999.0,
            10,
            "Tech",
        )
        .unwrap();
        product.add_tag("gamer").unwrap();
        product.add_tag("tech").unwrap();
        product
    }

    fn cache_with(client: Arc<MockCacheClient>) -> ProductCache {
        ProductCache::new(client, DEFAULT_PRODUCT_TTL)
    }

    #[test]
    fn test_build_key() {
        let cache = cache_with(Arc::new(MockCacheClient::new()));
        assert_eq!(cache.build_key(&ProductId::new("p1").unwrap()), "product_p1");
    }

    #[tokio::test]
    async fn test_set_writes_json_with_ttl() {
        let client = Arc::new(MockCacheClient::new());
        let cache = cache_with(client.clone());
        let product = laptop();

        assert!(cache.set(&product).await.is_applied());

        let (value, ttl) = client.entry("product_p123").unwrap();
        assert_eq!(ttl, DEFAULT_PRODUCT_TTL);
        assert_eq!(value, serde_json::to_string(&product).unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let client = Arc::new(MockCacheClient::new());
        let cache = cache_with(client.clone());

        let result = cache.get(&ProductId::new("p123").unwrap()).await;

        assert!(result.is_none());
        assert_eq!(client.calls(), vec![CacheCall::Get("product_p123".to_string())]);
    }

    #[tokio::test]
    async fn test_get_parses_cached_product() {
        let product = laptop();
        let json = serde_json::to_string(&product).unwrap();
        let client = Arc::new(MockCacheClient::new().with_entry("product_p123", &json));
        let cache = cache_with(client);

        let result = cache.get(product.id()).await.unwrap();

        assert_eq!(result, product);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let client = Arc::new(MockCacheClient::new().with_entry("product_p123", "{not json"));
        let cache = cache_with(client);

        let lookup = cache.lookup(&ProductId::new("p123").unwrap()).await;
        assert_eq!(lookup, ProductLookup::Miss);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_miss() {
        let client = Arc::new(
            MockCacheClient::new().with_entry("product_p123", r#"{"_id":"p123","_name":"Laptop"}"#),
        );
        let cache = cache_with(client);

        assert!(cache.get(&ProductId::new("p123").unwrap()).await.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_is_distinguished_from_miss() {
        let client = Arc::new(MockCacheClient::new().with_entry("product_p123", "{}"));
        client.set_unavailable(true);
        let cache = cache_with(client);

        let lookup = cache.lookup(&ProductId::new("p123").unwrap()).await;
        assert_eq!(lookup, ProductLookup::Unavailable);
        assert!(lookup.into_product().is_none());
    }

    #[tokio::test]
    async fn test_set_and_delete_during_outage_do_not_fail() {
        let client = Arc::new(MockCacheClient::new());
        client.set_unavailable(true);
        let cache = cache_with(client);

        assert_eq!(cache.set(&laptop()).await, CacheWrite::Unavailable);
        assert_eq!(
            cache.delete(&ProductId::new("p123").unwrap()).await,
            CacheWrite::Unavailable
        );
    }

    #[tokio::test]
    async fn test_delete_uses_built_key() {
        let client = Arc::new(MockCacheClient::new());
        let cache = cache_with(client.clone());

        assert!(cache.delete(&ProductId::new("p123").unwrap()).await.is_applied());
        assert_eq!(
            client.calls(),
            vec![CacheCall::Delete("product_p123".to_string())]
        );
    }
}
