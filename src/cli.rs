//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geoproxy - cache-aside IP geolocation proxy
#[derive(Parser, Debug)]
#[command(name = "geoproxy")]
#[command(version)]
#[command(about = "A cache-aside IP geolocation proxy", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Write a sample configuration file, or print it when no path is given
    GenerateConfig {
        /// Output path
        path: Option<PathBuf>,
    },
}
