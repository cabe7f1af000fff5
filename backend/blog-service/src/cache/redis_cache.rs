use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Pipeline};
use std::time::Duration;
use tracing::{debug, warn};

use super::{CacheError, CacheResult, PageCache, INDEX_KEY_PREFIX};

/// Page cache backed by Redis
#[derive(Clone)]
pub struct RedisPageCache {
    redis: ConnectionManager,
}

impl RedisPageCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self::new(redis))
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => {
                debug!(%key, "Page cache HIT");
                Ok(Some(data))
            }
            Ok(None) => {
                debug!(%key, "Page cache MISS");
                Ok(None)
            }
            Err(e) => {
                warn!(%key, "Redis read error for page cache: {}", e);
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        // SET EX rejects zero
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| {
                warn!(%key, "Failed to write page cache: {}", e);
                CacheError::Redis(e)
            })?;

        debug!(%key, ttl_secs, "Page cache WRITE");
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await?;

        debug!(%key, "Page cache INVALIDATE");
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        let pattern = format!("{}:*", INDEX_KEY_PREFIX);
        let mut cursor: u64 = 0;
        let mut total_deleted = 0usize;

        loop {
            // SCAN, not KEYS
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let mut pipe = Pipeline::new();
                for key in &keys {
                    pipe.del(key);
                }
                pipe.query_async::<_, ()>(&mut conn).await?;
                total_deleted += keys.len();
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(%pattern, deleted = total_deleted, "Page cache CLEAR");
        Ok(())
    }
}
