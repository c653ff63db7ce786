//! AWS Secrets Manager 实现

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use tracing::trace;

use super::SecretStore;
use crate::errors::{GeoProxyError, Result};

pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    /// 使用默认凭证链创建指定 region 的客户端
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn secret_string(&self, secret_name: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| {
                GeoProxyError::secret_store(format!(
                    "error retrieving secret: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        trace!("Secret '{}' retrieved", secret_name);

        output.secret_string().map(str::to_string).ok_or_else(|| {
            GeoProxyError::secret_store(format!(
                "secret '{}' has no string value",
                secret_name
            ))
        })
    }

    fn name(&self) -> &'static str {
        "AWS Secrets Manager"
    }
}
