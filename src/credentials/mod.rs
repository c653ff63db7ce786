//! 上游 API Key 解析
//!
//! 启动时执行一次：
//! 1. `from_secrets_manager = false` → 直接使用配置中的 api_key
//! 2. `from_secrets_manager = true` → 按 secret_name 从 Secrets Manager 读取
//!
//! 任一步失败都是 ConfigurationError，进程不会启动。

#[cfg(feature = "secrets-manager")]
mod aws;
mod secret_store;

#[cfg(feature = "secrets-manager")]
pub use aws::SecretsManagerStore;
pub use secret_store::{SECRET_API_KEY_FIELD, SecretStore, extract_api_key};

use tracing::{debug, info};

use crate::config::CredentialsConfig;
use crate::errors::{GeoProxyError, Result};

/// 上游 API Key，Debug 输出不泄露内容
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// API Key 来源（二选一）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Static(ApiKey),
    SecretStore { secret_name: String, region: String },
}

impl ApiKeySource {
    /// 根据配置确定来源，并检查所需字段
    pub fn from_config(config: &CredentialsConfig) -> Result<Self> {
        if config.from_secrets_manager {
            let secret_name = non_empty(config.secret_name.as_deref()).ok_or_else(|| {
                GeoProxyError::configuration("SECRET_NAME must be set when using Secrets Manager")
            })?;
            let region = non_empty(config.region.as_deref()).ok_or_else(|| {
                GeoProxyError::configuration("REGION_NAME must be set when using Secrets Manager")
            })?;

            Ok(Self::SecretStore {
                secret_name: secret_name.to_string(),
                region: region.to_string(),
            })
        } else {
            let key = non_empty(config.api_key.as_deref()).ok_or_else(|| {
                GeoProxyError::configuration(
                    "API_KEY must be set if not using Secrets Manager",
                )
            })?;
            Ok(Self::Static(ApiKey::new(key)))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 解析 API Key（启动时调用一次）
pub async fn resolve_api_key(config: &CredentialsConfig) -> Result<ApiKey> {
    match ApiKeySource::from_config(config)? {
        ApiKeySource::Static(key) => {
            debug!("Using API key from static configuration");
            Ok(key)
        }
        ApiKeySource::SecretStore {
            secret_name,
            region,
        } => {
            let store = secret_store_for_region(&region).await?;
            info!(
                "Fetching API key from {} (secret: {}, region: {})",
                store.name(),
                secret_name,
                region
            );
            fetch_api_key(store.as_ref(), &secret_name).await
        }
    }
}

/// 从 secret store 读取并解析 API Key
///
/// secret store 的任何错误都归为 ConfigurationError。
pub async fn fetch_api_key(store: &dyn SecretStore, secret_name: &str) -> Result<ApiKey> {
    let raw = store.secret_string(secret_name).await.map_err(|e| {
        GeoProxyError::configuration(format!(
            "Error fetching API key from {}: {}",
            store.name(),
            e.message()
        ))
    })?;

    extract_api_key(&raw)
}

#[cfg(feature = "secrets-manager")]
async fn secret_store_for_region(region: &str) -> Result<Box<dyn SecretStore>> {
    Ok(Box::new(SecretsManagerStore::new(region).await))
}

#[cfg(not(feature = "secrets-manager"))]
async fn secret_store_for_region(_region: &str) -> Result<Box<dyn SecretStore>> {
    Err(GeoProxyError::configuration(
        "API_KEY_FROM_SECRETSMANAGER is set but geoproxy was built without the `secrets-manager` feature",
    ))
}
