use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// 缓存查询结果
///
/// 只有明确的"不存在"才是 Miss；连接或协议错误走 `Err`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    /// 成功获取到缓存值
    Hit(Vec<u8>),
    /// 确定不存在（或已过期）
    Miss,
}

/// 带 TTL 的键值缓存
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<CacheResult>;

    /// 写入并设置过期时间，同 key 后写覆盖先写
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// 获取后端名称（用于日志）
    fn name(&self) -> &'static str;
}
