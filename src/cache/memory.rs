use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::cache::{CacheResult, CacheStore};
use crate::errors::Result;

#[derive(Clone)]
struct Entry {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// 每条记录使用写入时给定的 TTL
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // 覆盖写入时重新计时
        Some(value.ttl)
    }
}

/// 进程内缓存，用于本地开发和测试
pub struct MemoryCacheStore {
    inner: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!("MemoryCacheStore initialized with max capacity: {}", max_capacity);
        Self { inner }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<CacheResult> {
        match self.inner.get(key).await {
            Some(entry) => {
                trace!("Cache hit for key: {}", key);
                Ok(CacheResult::Hit(entry.bytes.to_vec()))
            }
            None => Ok(CacheResult::Miss),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.inner
            .insert(
                key.to_string(),
                Entry {
                    bytes: value.into(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
