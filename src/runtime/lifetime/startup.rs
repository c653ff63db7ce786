use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::create_cache_store;
use crate::config::StaticConfig;
use crate::credentials::resolve_api_key;
use crate::errors::Result;
use crate::models::Provenance;
use crate::services::LookupService;
use crate::upstream::{GeoUpstream, IpGeolocationProvider};

pub struct StartupContext {
    pub lookup_service: Arc<LookupService>,
}

/// 准备服务器启动的上下文
///
/// 顺序：缓存配置 → API Key → 上游客户端 → LookupService。
/// 任一步失败都直接返回，不会部分启动。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let cache = create_cache_store(&config.cache).await?;

    let api_key = resolve_api_key(&config.credentials).await?;
    debug!("Upstream API key resolved");

    let upstream: Arc<dyn GeoUpstream> = Arc::new(IpGeolocationProvider::new(
        &config.upstream.url,
        api_key,
        Duration::from_secs(config.upstream.timeout_secs),
    ));
    info!(
        "Upstream: {} at {} (timeout {}s)",
        upstream.name(),
        config.upstream.url,
        config.upstream.timeout_secs
    );

    let provenance = Provenance::new(&config.server.identity, &config.server.version);
    info!(
        "Serving as apiServer={} version={}",
        provenance.api_server, provenance.version
    );

    let lookup_service = Arc::new(LookupService::with_ttl(
        cache,
        upstream,
        provenance,
        Duration::from_secs(config.cache.ttl_secs),
    ));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { lookup_service })
}
