use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::{CacheResult, PageCache};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local page cache. Expiry is checked on read, and every write
/// sweeps out whatever has expired so keys that are never read again do
/// not pile up. It uses tokio's clock so paused-time tests can step over
/// the TTL.
#[derive(Debug, Default)]
pub struct MemoryPageCache {
    entries: DashMap<String, Entry>,
}

impl MemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PageCache for MemoryPageCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone());

        if hit.is_none() {
            // drop the expired entry, if any
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
            debug!(%key, "Page cache MISS");
        } else {
            debug!(%key, "Page cache HIT");
        }

        Ok(hit)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let swept = before.saturating_sub(self.entries.len());
        if swept > 0 {
            debug!(swept, "Page cache swept expired entries");
        }

        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.entries.clear();
        Ok(())
    }
}
