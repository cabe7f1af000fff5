/// Rendered-page caching
///
/// The home page is served from a short-lived cache entry. The cache is a
/// collaborator injected into the handlers rather than process-wide state:
///
/// - `RedisPageCache`: shared Redis cache for multi-instance deployments
/// - `MemoryPageCache`: in-process cache with the same expiry semantics
mod memory_cache;
mod redis_cache;

pub use memory_cache::MemoryPageCache;
pub use redis_cache::RedisPageCache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Version segment of every key, bump to orphan old renders
pub const CACHE_VERSION: &str = "v1";

/// Prefix shared by all cached index renders
pub const INDEX_KEY_PREFIX: &str = "index";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Key for one rendered index page. The raw query value is used so that
/// `?page=2` and `?page=02` are cached separately, like any URL-keyed cache.
pub fn index_key(raw_page: Option<&str>) -> String {
    format!(
        "{}:{}:page:{}",
        INDEX_KEY_PREFIX,
        CACHE_VERSION,
        raw_page.unwrap_or("")
    )
}

#[async_trait]
pub trait PageCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Drop every rendered page.
    async fn clear(&self) -> CacheResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_are_versioned_per_raw_page() {
        assert_eq!(index_key(None), "index:v1:page:");
        assert_eq!(index_key(Some("2")), "index:v1:page:2");
        assert_ne!(index_key(Some("2")), index_key(Some("02")));
    }
}
