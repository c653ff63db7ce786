//! 上游地理位置 API
//!
//! 按次计费，所以这里不做重试：失败直接返回 UpstreamError。

mod ipgeolocation;

pub use ipgeolocation::IpGeolocationProvider;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::GeoRecord;

/// 上游查询 trait
#[async_trait]
pub trait GeoUpstream: Send + Sync {
    /// 查询单个 IP，返回未加来源字段的记录
    async fn fetch(&self, ip: &str) -> Result<GeoRecord>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}
