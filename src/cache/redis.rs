use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, error, trace, warn};

use crate::cache::{CacheResult, CacheStore};
use crate::errors::{GeoProxyError, Result};

pub struct RedisCacheStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
    op_timeout: Duration,
}

impl RedisCacheStore {
    /// 创建客户端（不建立连接，首次使用时再连）
    pub fn new(url: &str, key_prefix: &str, op_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            GeoProxyError::configuration(format!("invalid cache address '{}': {}", url, e))
        })?;

        debug!(
            "RedisCacheStore created for {} with prefix: '{}', op timeout: {:?}",
            url, key_prefix, op_timeout
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: key_prefix.to_string(),
            op_timeout,
        })
    }

    /// 启动时探测连通性，失败不阻止启动
    pub async fn ping(&self) -> Result<()> {
        let result = timeout(self.op_timeout, async {
            let mut conn = self.get_connection().await?;
            redis::cmd("PING").query_async::<String>(&mut conn).await
        })
        .await;

        match result {
            Ok(Ok(response)) => {
                debug!("Redis connection test successful: {}", response);
                Ok(())
            }
            Ok(Err(e)) => {
                self.reset_connection().await;
                Err(GeoProxyError::cache(format!("cache ping failed: {}", e)))
            }
            Err(_) => {
                self.reset_connection().await;
                Err(self.timeout_error("ping"))
            }
        }
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn timeout_error(&self, op: &str) -> GeoProxyError {
        GeoProxyError::cache(format!(
            "cache {} timed out after {}ms",
            op,
            self.op_timeout.as_millis()
        ))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<CacheResult> {
        let redis_key = self.make_key(key);

        let result = timeout(self.op_timeout, async {
            let mut conn = self.get_connection().await?;
            let value: Option<Vec<u8>> = conn.get(redis_key.as_str()).await?;
            Ok::<_, redis::RedisError>(value)
        })
        .await;

        match result {
            Ok(Ok(Some(data))) => {
                trace!("Cache hit for key: {}", key);
                Ok(CacheResult::Hit(data))
            }
            Ok(Ok(None)) => {
                trace!("Key not found in cache: {}", key);
                Ok(CacheResult::Miss)
            }
            Ok(Err(e)) => {
                error!("Failed to get key '{}': {}", key, e);
                // 连接可能已断开，重置连接
                self.reset_connection().await;
                Err(GeoProxyError::cache(format!(
                    "error retrieving from cache: {}",
                    e
                )))
            }
            Err(_) => {
                error!("Cache get for key '{}' timed out", key);
                self.reset_connection().await;
                Err(self.timeout_error("get"))
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let redis_key = self.make_key(key);
        // SETEX 不接受 0 秒
        let ttl_secs = ttl.as_secs().max(1);

        let result = timeout(self.op_timeout, async {
            let mut conn = self.get_connection().await?;
            let _: () = conn.set_ex(redis_key.as_str(), value, ttl_secs).await?;
            Ok::<_, redis::RedisError>(())
        })
        .await;

        match result {
            Ok(Ok(())) => {
                trace!("Successfully inserted key into cache: {} (ttl {}s)", key, ttl_secs);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("Failed to insert key '{}' into cache: {}", key, e);
                self.reset_connection().await;
                Err(GeoProxyError::cache(format!(
                    "error setting data to cache: {}",
                    e
                )))
            }
            Err(_) => {
                self.reset_connection().await;
                Err(self.timeout_error("set"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
