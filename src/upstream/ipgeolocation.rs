//! ipgeolocation.io 风格的 HTTP API 实现
//!
//! 请求格式：`GET {url}?apiKey=<key>&ip=<ip>`，200 时响应体为 JSON 记录，
//! 其他状态码（包括 204 等 2xx）都是 UpstreamError。

use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};
use ureq::Agent;
use ureq::http::StatusCode;

use super::GeoUpstream;
use crate::credentials::ApiKey;
use crate::errors::{GeoProxyError, Result};
use crate::models::GeoRecord;

pub struct IpGeolocationProvider {
    agent: Agent,
    url: String,
    api_key: ApiKey,
}

impl IpGeolocationProvider {
    pub fn new(url: &str, api_key: ApiKey, timeout: Duration) -> Self {
        // 错误状态码不转成 Err，这样可以拿到响应体
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: url.to_string(),
            api_key,
        }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn fetch_sync(agent: Agent, url: String, api_key: ApiKey, ip: String) -> Result<GeoRecord> {
        let resp = agent
            .get(&url)
            .query("apiKey", api_key.expose())
            .query("ip", &ip)
            .call()
            .map_err(|e| {
                warn!("Upstream request for {} failed: {}", ip, e);
                GeoProxyError::upstream_transport(format!("error making API request: {}", e))
            })?;

        let status = resp.status();

        // 只有 200 才解析响应体
        if status != StatusCode::OK {
            let body = resp.into_body().read_to_string().unwrap_or_default();
            warn!("Upstream returned {} for {}", status.as_u16(), ip);
            return Err(GeoProxyError::upstream_status(status.as_u16(), body));
        }

        let body = resp.into_body().read_to_string().map_err(|e| {
            GeoProxyError::upstream_transport(format!("error reading API response: {}", e))
        })?;

        let record: GeoRecord = serde_json::from_str(&body).map_err(|e| {
            GeoProxyError::deserialization(format!("error unmarshaling API response: {}", e))
        })?;

        trace!(
            "Upstream lookup for {}: country={}, city={}",
            ip, record.country, record.city
        );

        Ok(record)
    }
}

#[async_trait]
impl GeoUpstream for IpGeolocationProvider {
    async fn fetch(&self, ip: &str) -> Result<GeoRecord> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let api_key = self.api_key.clone();
        let ip = ip.to_string();

        // ureq 是同步客户端，放到阻塞线程池执行
        tokio::task::spawn_blocking(move || Self::fetch_sync(agent, url, api_key, ip))
            .await
            .unwrap_or_else(|e| {
                Err(GeoProxyError::upstream_transport(format!(
                    "upstream task failed: {}",
                    e
                )))
            })
    }

    fn name(&self) -> &'static str {
        "ipgeolocation"
    }
}
