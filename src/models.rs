//! Geolocation record
//!
//! `GeoRecord` is both the upstream response shape and the cached payload.
//! Location fields are kept as the strings the upstream returns.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// 是否命中缓存，线上格式为 "True" / "False" 字符串
    #[serde(default, with = "title_case_bool")]
    pub cached: bool,
    #[serde(default, rename = "apiServer", deserialize_with = "null_as_empty")]
    pub api_server: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ip: String,
    #[serde(default, rename = "continent_name", deserialize_with = "null_as_empty")]
    pub continent: String,
    #[serde(default, rename = "country_name", deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub latitude: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub longitude: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub isp: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub organization: String,
}

/// 上游对未知字段会返回 `null`，按空字符串处理
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl GeoRecord {
    /// 覆盖来源字段（每次返回或写入缓存前调用）
    pub fn stamp(&mut self, cached: bool, provenance: &Provenance) {
        self.cached = cached;
        self.api_server.clone_from(&provenance.api_server);
        self.version.clone_from(&provenance.version);
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// 服务实例标识，启动时确定，之后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub api_server: String,
    pub version: String,
}

impl Provenance {
    pub fn new(api_server: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_server: api_server.into(),
            version: version.into(),
        }
    }
}

/// `bool` <-> `"True"` / `"False"`
mod title_case_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Text(String),
            Bool(bool),
        }

        Ok(match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
            Some(Flag::Bool(b)) => b,
            None => false,
        })
    }
}
