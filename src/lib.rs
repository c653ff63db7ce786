//! geoproxy - A cache-aside IP geolocation proxy
//!
//! Answers `GET /ip/{ip}` from a shared TTL cache and falls back to a paid
//! upstream geolocation API on a miss, writing the answer back for an hour.
//! Every response carries provenance: whether it came from cache, which
//! instance served it and the software version.
//!
//! # Features
//! - **secrets-manager**: resolve the upstream API key from AWS Secrets Manager (default)
//!
//! # Architecture
//! - `services`: the cache-aside lookup
//! - `cache`: cache stores (Redis, in-process moka)
//! - `upstream`: upstream geolocation API client
//! - `credentials`: API key resolution at startup
//! - `api`: HTTP routes and middleware
//! - `config`: static configuration
//! - `runtime`: startup, server mode, shutdown
//! - `system`: logging

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod system;
pub mod upstream;
