//! In-memory implementation of KeyValueCache for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::errors::DomainError;

use super::r#trait::KeyValueCache;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// In-memory key-value store with real expiry semantics
///
/// Uses `tokio::time::Instant`, so tests running under a paused runtime can
/// drive expiry with `tokio::time::advance`.
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of live entries, for assertions
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(entry) => Ok(!entry.is_expired(now)),
            None => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn increment(&self, key: &str) -> Result<i64, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let next = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let current: i64 =
                    entry.value.parse().map_err(|_| DomainError::Internal {
                        message: format!("Counter at {} holds a non-numeric value", key),
                    })?;
                current + 1
            }
            _ => 1,
        };

        // A fresh counter carries no expiry, matching Redis INCR
        let expires_at = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => entry.expires_at,
            _ => None,
        };
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at = Some(now + Duration::from_secs(ttl_seconds));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, DomainError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry
                .expires_at
                .map(|deadline| deadline.duration_since(now).as_secs())),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_get_expiry() {
        let cache = InMemoryCache::new();
        cache.set_with_expiry("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set_with_expiry("k", "v", 60).await.unwrap();
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_increment_then_expire() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.increment("count").await.unwrap(), 1);
        // Fresh counters live until an expiry is set
        assert_eq!(cache.ttl("count").await.unwrap(), None);

        assert!(cache.expire("count", 30).await.unwrap());
        assert_eq!(cache.increment("count").await.unwrap(), 2);
        assert_eq!(cache.increment("count").await.unwrap(), 3);

        tokio::time::advance(Duration::from_secs(31)).await;
        // Window elapsed, counting restarts
        assert_eq!(cache.increment("count").await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_reports_remaining_life() {
        let cache = InMemoryCache::new();
        cache.set_with_expiry("k", "v", 120).await.unwrap();

        tokio::time::advance(Duration::from_secs(20)).await;
        let remaining = cache.ttl("k").await.unwrap().unwrap();
        assert_eq!(remaining, 100);
    }

    #[tokio::test]
    async fn test_increment_rejects_non_numeric() {
        let cache = InMemoryCache::new();
        cache.set_with_expiry("k", "text", 60).await.unwrap();
        assert!(cache.increment("k").await.is_err());
    }
}
