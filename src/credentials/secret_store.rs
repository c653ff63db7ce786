use std::collections::HashMap;

use async_trait::async_trait;

use super::ApiKey;
use crate::errors::{GeoProxyError, Result};

/// secret JSON 中保存 API Key 的字段名
pub const SECRET_API_KEY_FIELD: &str = "API_KEY";

/// Secret store 抽象
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 读取 secret 的原始字符串值
    async fn secret_string(&self, secret_name: &str) -> Result<String>;

    /// 获取 store 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 从 secret 值中取出 API Key
///
/// secret 值是一个 JSON 对象，例如 `{"API_KEY": "..."}`。
pub fn extract_api_key(secret: &str) -> Result<ApiKey> {
    let data: HashMap<String, String> = serde_json::from_str(secret)
        .map_err(|e| GeoProxyError::configuration(format!("error parsing secret JSON: {}", e)))?;

    match data.get(SECRET_API_KEY_FIELD) {
        Some(key) if !key.is_empty() => Ok(ApiKey::new(key.clone())),
        _ => Err(GeoProxyError::configuration(format!(
            "{} not found in the secret",
            SECRET_API_KEY_FIELD
        ))),
    }
}
