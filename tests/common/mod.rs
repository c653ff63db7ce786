//! Shared test doubles for the cache store and the upstream provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use geoproxy::cache::{CacheResult, CacheStore};
use geoproxy::errors::{GeoProxyError, Result};
use geoproxy::models::{GeoRecord, Provenance};
use geoproxy::services::LookupService;
use geoproxy::upstream::GeoUpstream;

/// In-memory cache that counts calls and can be told to fail
#[derive(Default)]
pub struct MockCache {
    data: RwLock<HashMap<String, Vec<u8>>>,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub last_ttl: std::sync::Mutex<Option<Duration>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_get() -> Self {
        let cache = Self::default();
        cache.fail_get.store(true, Ordering::SeqCst);
        cache
    }

    pub fn failing_set() -> Self {
        let cache = Self::default();
        cache.fail_set.store(true, Ordering::SeqCst);
        cache
    }

    pub async fn put_raw(&self, key: &str, bytes: &[u8]) {
        self.data
            .write()
            .await
            .insert(key.to_string(), bytes.to_vec());
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().await.get(key).cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MockCache {
    async fn get(&self, key: &str) -> Result<CacheResult> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(GeoProxyError::cache(
                "error retrieving from cache: connection refused",
            ));
        }
        Ok(match self.data.read().await.get(key) {
            Some(bytes) => CacheResult::Hit(bytes.clone()),
            None => CacheResult::Miss,
        })
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(GeoProxyError::cache("error setting data to cache: broken pipe"));
        }
        *self.last_ttl.lock().unwrap() = Some(ttl);
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Upstream that returns a fixed answer and counts calls
pub struct MockUpstream {
    response: Result<GeoRecord>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl MockUpstream {
    pub fn returning(record: GeoRecord) -> Self {
        Self {
            response: Ok(record),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: GeoProxyError) -> Self {
        Self {
            response: Err(err),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// 每次 fetch 先等待给定时长
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoUpstream for MockUpstream {
    async fn fetch(&self, _ip: &str) -> Result<GeoRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub fn berlin_record(ip: &str) -> GeoRecord {
    GeoRecord {
        ip: ip.to_string(),
        continent: "Europe".to_string(),
        country: "Germany".to_string(),
        city: "Berlin".to_string(),
        latitude: "52.52437".to_string(),
        longitude: "13.41053".to_string(),
        isp: "Deutsche Telekom AG".to_string(),
        organization: "Deutsche Telekom AG".to_string(),
        ..Default::default()
    }
}

pub fn test_provenance() -> Provenance {
    Provenance::new("api-test-1", "9.9.9")
}

pub fn lookup_service(cache: Arc<MockCache>, upstream: Arc<MockUpstream>) -> LookupService {
    LookupService::new(cache, upstream, test_provenance())
}
