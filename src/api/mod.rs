//! HTTP 接口
//!
//! - `GET /ip/{ip}`: 查询地理位置
//! - `GET /status`: 存活检查

pub mod middleware;
pub mod services;
