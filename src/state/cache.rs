use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;

/// Key-value cache with per-entry expiry.
///
/// Backs the search result cache and OTP storage. Callers on the search path
/// must treat every error as a miss; the cache is a degradable collaborator,
/// never a source of request failure.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get a value, None when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value with a TTL in seconds
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Create a new redis cache and verify the connection
    pub async fn new(redis_url: &str, prefix: &str) -> Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        // Test connection
        let mut test_conn = connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut test_conn)
            .await
            .map_err(|e| AppError::Cache(format!("Redis connection test failed: {}", e)))?;

        tracing::info!("Initialized Redis cache with prefix '{}'", prefix);

        Ok(Self {
            connection,
            key_prefix: prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await?;
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(self.full_key(key), value, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(self.full_key(key)).await?;
        Ok(())
    }
}

/// No-op cache for degraded mode: every lookup misses, every write succeeds
#[derive(Clone, Default)]
pub struct NoopCache;

impl NoopCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// In-process cache with expiry, for tests and single-node local runs
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // The read guard must be released before removing, or the removal
        // blocks on the same shard
        let expired = match self.entries.get(key) {
            Some(entry) if entry.1 > Utc::now() => return Ok(Some(entry.0.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let expires = Utc::now() + Duration::seconds(ttl_secs as i64);
        self.entries.insert(key.to_string(), (value.to_string(), expires));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Cache that fails every operation; used to exercise degraded-mode paths
#[cfg(test)]
#[derive(Clone, Default)]
pub struct FailingCache;

#[cfg(test)]
#[async_trait]
impl KeyValueCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(AppError::Cache("backend unreachable".to_string()))
    }

    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Err(AppError::Cache("backend unreachable".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(AppError::Cache("backend unreachable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache.set_with_expiry("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));

        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_expiry() {
        let cache = MemoryCache::new();
        cache.set_with_expiry("k", "v", 0).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        // TTL of zero expires immediately
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_and_key_reusable() {
        let cache = MemoryCache::new();
        cache.set_with_expiry("k", "old", 0).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        // The expired read must complete, evict the entry, and leave the
        // shard usable for subsequent writes
        assert_eq!(cache.get("k").await.unwrap(), None);
        cache.set_with_expiry("k", "new", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopCache::new();
        cache.set_with_expiry("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }
}
