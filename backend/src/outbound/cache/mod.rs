//! Redis-backed `Cache`: get/set/delete with TTLs over a bb8 connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;

use crate::domain::ports::{Cache, CacheError, CacheValue, NOT_FOUND_SENTINEL};

/// bb8-pooled Redis implementation of the cache port.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisCache {
    /// # Errors
    /// Returns [`CacheError::Backend`] if the pool cannot be built or the
    /// manager cannot be constructed from `redis_url`.
    pub async fn new(redis_url: &str, max_size: u32) -> Result<Self, CacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| CacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(value.map(|value| {
            if value == NOT_FOUND_SENTINEL {
                CacheValue::NotFound
            } else {
                CacheValue::Url(value)
            }
        }))
    }

    async fn put_url(&self, key: &str, url: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        conn.set_ex::<_, _, ()>(key, url, ttl.as_secs())
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    async fn put_not_found(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        self.put_url(key, NOT_FOUND_SENTINEL, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }
}
