//! Cache-aside 查询
//!
//! 1. 查缓存：命中直接返回（cached = true），不访问上游、不回写
//! 2. 未命中：请求上游（cached = false）
//! 3. 回写缓存，失败只记录警告
//!
//! 缓存读错误（非"不存在"）直接失败，不降级到上游。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::{CacheResult, CacheStore};
use crate::errors::{GeoProxyError, Result};
use crate::models::{GeoRecord, Provenance};
use crate::upstream::GeoUpstream;

/// 默认缓存时长（1 小时）
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

pub struct LookupService {
    cache: Arc<dyn CacheStore>,
    upstream: Arc<dyn GeoUpstream>,
    provenance: Provenance,
    ttl: Duration,
}

impl LookupService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        upstream: Arc<dyn GeoUpstream>,
        provenance: Provenance,
    ) -> Self {
        Self::with_ttl(cache, upstream, provenance, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(
        cache: Arc<dyn CacheStore>,
        upstream: Arc<dyn GeoUpstream>,
        provenance: Provenance,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            upstream,
            provenance,
            ttl,
        }
    }

    pub async fn resolve(&self, ip: &str) -> Result<GeoRecord> {
        match self.cache.get(ip).await? {
            CacheResult::Hit(bytes) => {
                let mut record = GeoRecord::from_bytes(&bytes).map_err(|e| {
                    GeoProxyError::deserialization(format!(
                        "error unmarshaling cached data: {}",
                        e
                    ))
                })?;
                record.stamp(true, &self.provenance);
                trace!("Cache hit for {}", ip);
                Ok(record)
            }
            CacheResult::Miss => {
                debug!("Cache miss for {}, fetching from {}", ip, self.upstream.name());

                let mut record = self.upstream.fetch(ip).await?;
                record.stamp(false, &self.provenance);

                if let Err(e) = self.store(ip, &record).await {
                    warn!("Error caching data for {}: {}", ip, e);
                }

                Ok(record)
            }
        }
    }

    /// 回写缓存，错误统一为 CacheWrite
    async fn store(&self, ip: &str, record: &GeoRecord) -> Result<()> {
        let bytes = record.to_bytes().map_err(|e| {
            GeoProxyError::cache_write(format!("error marshaling data for cache: {}", e))
        })?;

        self.cache
            .set(ip, bytes, self.ttl)
            .await
            .map_err(|e| GeoProxyError::cache_write(e.message()))
    }
}
