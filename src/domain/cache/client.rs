//! Cache client trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use super::state::ConnectionState;

/// Outcome of a cache read.
///
/// `Unavailable` covers a disconnected or disabled client as well as a
/// failed or timed out remote call. Callers that only care about presence
/// use [`CacheLookup::into_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(String),
    Miss,
    Unavailable,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable => None,
        }
    }
}

/// Outcome of a cache write or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Applied,
    Unavailable,
}

impl CacheWrite {
    pub fn is_applied(&self) -> bool {
        *self == Self::Applied
    }
}

/// Primitive operations against the remote cache.
///
/// None of the operations fail: every problem is logged by the
/// implementation and reported as `Unavailable`.
#[async_trait]
pub trait CacheClient: Send + Sync + Debug {
    /// Reads a raw value
    async fn get(&self, key: &str) -> CacheLookup;

    /// Writes a raw value that expires after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheWrite;

    /// Removes a value; removing an absent key is not an error
    async fn delete(&self, key: &str) -> CacheWrite;

    /// Current connection state
    fn state(&self) -> ConnectionState;

    /// Releases the connection. Idempotent.
    async fn disconnect(&self);
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A call observed by [`MockCacheClient`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CacheCall {
        Get(String),
        Set { key: String, value: String, ttl: Duration },
        Delete(String),
    }

    /// Recording cache client for testing
    #[derive(Debug, Default)]
    pub struct MockCacheClient {
        entries: Mutex<HashMap<String, (String, Duration)>>,
        calls: Mutex<Vec<CacheCall>>,
        unavailable: Mutex<bool>,
    }

    impl MockCacheClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a raw entry without recording a call
        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), Duration::from_secs(60)));
            self
        }

        /// Every operation reports `Unavailable` while set
        pub fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.lock().unwrap() = unavailable;
        }

        pub fn entry(&self, key: &str) -> Option<(String, Duration)> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn calls(&self) -> Vec<CacheCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn set_calls(&self) -> Vec<CacheCall> {
            self.calls()
                .into_iter()
                .filter(|c| matches!(c, CacheCall::Set { .. }))
                .collect()
        }

        fn record(&self, call: CacheCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn is_unavailable(&self) -> bool {
            *self.unavailable.lock().unwrap()
        }
    }

    #[async_trait]
    impl CacheClient for MockCacheClient {
        async fn get(&self, key: &str) -> CacheLookup {
            self.record(CacheCall::Get(key.to_string()));

            if self.is_unavailable() {
                return CacheLookup::Unavailable;
            }

            match self.entries.lock().unwrap().get(key) {
                Some((value, _)) => CacheLookup::Hit(value.clone()),
                None => CacheLookup::Miss,
            }
        }

        async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheWrite {
            self.record(CacheCall::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl,
            });

            if self.is_unavailable() {
                return CacheWrite::Unavailable;
            }

            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl));
            CacheWrite::Applied
        }

        async fn delete(&self, key: &str) -> CacheWrite {
            self.record(CacheCall::Delete(key.to_string()));

            if self.is_unavailable() {
                return CacheWrite::Unavailable;
            }

            self.entries.lock().unwrap().remove(key);
            CacheWrite::Applied
        }

        fn state(&self) -> ConnectionState {
            if self.is_unavailable() {
                ConnectionState::Disabled
            } else {
                ConnectionState::Connected
            }
        }

        async fn disconnect(&self) {}
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_records_calls() {
            let cache = MockCacheClient::new();

            assert_eq!(cache.get("k").await, CacheLookup::Miss);
            assert!(cache.set("k", "v", Duration::from_secs(5)).await.is_applied());
            assert_eq!(cache.get("k").await, CacheLookup::Hit("v".to_string()));
            assert!(cache.delete("k").await.is_applied());

            assert_eq!(cache.calls().len(), 4);
            assert_eq!(cache.set_calls().len(), 1);
        }

        #[tokio::test]
        async fn test_mock_outage() {
            let cache = MockCacheClient::new().with_entry("k", "v");
            cache.set_unavailable(true);

            assert_eq!(cache.get("k").await, CacheLookup::Unavailable);
            assert_eq!(
                cache.set("k", "w", Duration::from_secs(5)).await,
                CacheWrite::Unavailable
            );
            assert_eq!(cache.entry("k").unwrap().0, "v");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_into_value() {
        assert_eq!(
            CacheLookup::Hit("x".to_string()).into_value(),
            Some("x".to_string())
        );
        assert_eq!(CacheLookup::Miss.into_value(), None);
        assert_eq!(CacheLookup::Unavailable.into_value(), None);
        assert!(!CacheLookup::Unavailable.is_hit());
    }
}
