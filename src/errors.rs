use std::fmt;

#[derive(Debug, Clone)]
pub enum GeoProxyError {
    Configuration(String),
    Cache(String),
    Upstream { status: Option<u16>, body: String },
    Deserialization(String),
    CacheWrite(String),
    SecretStore(String),
}

impl GeoProxyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoProxyError::Configuration(_) => "E001",
            GeoProxyError::Cache(_) => "E002",
            GeoProxyError::Upstream { .. } => "E003",
            GeoProxyError::Deserialization(_) => "E004",
            GeoProxyError::CacheWrite(_) => "E005",
            GeoProxyError::SecretStore(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoProxyError::Configuration(_) => "Configuration Error",
            GeoProxyError::Cache(_) => "Cache Error",
            GeoProxyError::Upstream { .. } => "Upstream Error",
            GeoProxyError::Deserialization(_) => "Deserialization Error",
            GeoProxyError::CacheWrite(_) => "Cache Write Warning",
            GeoProxyError::SecretStore(_) => "Secret Store Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            GeoProxyError::Configuration(msg) => msg.clone(),
            GeoProxyError::Cache(msg) => msg.clone(),
            GeoProxyError::Upstream {
                status: Some(status),
                body,
            } => format!("upstream returned HTTP {}: {}", status, body),
            GeoProxyError::Upstream { status: None, body } => {
                format!("upstream request failed: {}", body)
            }
            GeoProxyError::Deserialization(msg) => msg.clone(),
            GeoProxyError::CacheWrite(msg) => msg.clone(),
            GeoProxyError::SecretStore(msg) => msg.clone(),
        }
    }

    /// 格式化为彩色输出（用于启动失败时打印到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoProxyError {}

// 便捷的构造函数
impl GeoProxyError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::Configuration(msg.into())
    }

    pub fn cache<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::Cache(msg.into())
    }

    pub fn upstream_status<T: Into<String>>(status: u16, body: T) -> Self {
        GeoProxyError::Upstream {
            status: Some(status),
            body: body.into(),
        }
    }

    pub fn upstream_transport<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::Upstream {
            status: None,
            body: msg.into(),
        }
    }

    pub fn deserialization<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::Deserialization(msg.into())
    }

    pub fn cache_write<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::CacheWrite(msg.into())
    }

    pub fn secret_store<T: Into<String>>(msg: T) -> Self {
        GeoProxyError::SecretStore(msg.into())
    }
}

impl From<serde_json::Error> for GeoProxyError {
    fn from(err: serde_json::Error) -> Self {
        GeoProxyError::Deserialization(err.to_string())
    }
}

impl From<config::ConfigError> for GeoProxyError {
    fn from(err: config::ConfigError) -> Self {
        GeoProxyError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoProxyError>;
