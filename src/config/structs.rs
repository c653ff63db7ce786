use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{GeoProxyError, Result};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 环境变量前缀：GEO__SERVER__PORT=9999
const ENV_PREFIX: &str = "GEO";

/// 部署环境中已经在用的扁平环境变量 → 配置键
///
/// 同一个配置键可对应多个变量，靠后的优先。
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_PORT", "server.port"),
    ("HOSTNAME", "server.identity"),
    ("APP_VERSION", "server.version"),
    ("CACHE_HOST", "cache.host"),
    ("MEMCACHED_HOST", "cache.host"),
    ("CACHE_PORT", "cache.port"),
    ("MEMCACHED_PORT", "cache.port"),
    ("API_KEY", "credentials.api_key"),
    ("SECRET_NAME", "credentials.secret_name"),
    ("REGION_NAME", "credentials.region"),
];

/// 静态配置（启动时加载一次，之后只读）
///
/// - server: 监听地址、端口、实例标识
/// - cache: 缓存后端配置
/// - upstream: 上游地理位置 API
/// - credentials: API Key 来源
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和进程环境变量加载配置
    ///
    /// 优先级：扁平 ENV > GEO__ 前缀 ENV > config 文件 > 默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// 与 `load` 相同，但环境变量来自给定的 map
    pub fn load_from(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        use config::{Config, Environment, File};

        // 显式指定的配置文件必须存在，默认文件可选
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        for (var, key) in FLAT_ENV_OVERRIDES {
            let value = env.get(*var).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        if let Some(flag) = env.get("API_KEY_FROM_SECRETSMANAGER") {
            builder =
                builder.set_override("credentials.from_secrets_manager", parse_flag(flag))?;
        }

        let config = builder.build()?.try_deserialize::<StaticConfig>()?;
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// "True" / "true" / "1" 视为开启
fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// 写入响应 `apiServer` 字段的实例标识
    #[serde(default = "default_server_identity")]
    pub identity: String,
    /// 写入响应 `version` 字段的版本号
    #[serde(default = "default_server_version")]
    pub version: String,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

/// 缓存系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// 为空时直接用 IP 作为 key
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// 单次缓存操作超时
    #[serde(default = "default_cache_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
}

impl CacheConfig {
    /// Redis 连接地址，host/port 缺一不可
    pub fn redis_url(&self) -> Result<String> {
        match (self.host.as_deref(), self.port) {
            (Some(host), Some(port)) if !host.is_empty() => {
                Ok(format!("redis://{}:{}/", host, port))
            }
            _ => Err(GeoProxyError::configuration(
                "cache host and port must be set (CACHE_HOST/CACHE_PORT or cache.host/cache.port)",
            )),
        }
    }
}

/// 上游 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

/// API Key 来源配置
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub from_secrets_manager: bool,
    #[serde(default)]
    pub secret_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("from_secrets_manager", &self.from_secrets_manager)
            .field("secret_name", &self.secret_name)
            .field("region", &self.region)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_identity() -> String {
    "none".to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_timeout_ms() -> u64 {
    1000
}

fn default_memory_capacity() -> u64 {
    10000
}

fn default_upstream_url() -> String {
    "https://api.ipgeolocation.io/ipgeo".to_string()
}

fn default_upstream_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            identity: default_server_identity(),
            version: default_server_version(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            host: None,
            port: None,
            key_prefix: String::new(),
            ttl_secs: default_cache_ttl(),
            timeout_ms: default_cache_timeout_ms(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
