//! Mode routing
//!
//! - Server mode (default): HTTP lookup service
//! - Config generation: writes or prints a sample `config.toml`

pub mod server;

pub use server::run_server;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::StaticConfig;

/// 生成示例配置：有路径则写文件，否则打印到 stdout
pub fn run_generate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("Failed to write sample config to {}", path.display()))?;
            println!("Sample configuration written to {}", path.display());
        }
        None => {
            print!("{}", StaticConfig::generate_sample_config());
        }
    }
    Ok(())
}
