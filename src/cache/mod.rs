//! 缓存存储
//!
//! - `redis`: 网络缓存，多实例共享（默认）
//! - `memory`: 进程内 moka 缓存，本地开发用
//!
//! 过期完全交给存储自身的 TTL，没有主动失效。

pub mod memory;
pub mod redis;
pub mod traits;

pub use memory::MemoryCacheStore;
pub use redis::RedisCacheStore;
pub use traits::{CacheResult, CacheStore};

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{CacheBackend, CacheConfig};
use crate::errors::Result;

/// 根据配置创建缓存后端
///
/// redis 后端缺少 host/port 时返回 ConfigurationError；
/// 连接探测失败只记录警告，请求时再报 CacheError。
pub async fn create_cache_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Redis => {
            let url = config.redis_url()?;
            let store = RedisCacheStore::new(
                &url,
                &config.key_prefix,
                Duration::from_millis(config.timeout_ms),
            )?;
            if let Err(e) = store.ping().await {
                warn!("Cache at {} is not reachable yet: {}", url, e);
            }
            Arc::new(store)
        }
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(config.memory_capacity)),
    };

    info!("Cache: Initialized with {} backend", store.name());
    Ok(store)
}
