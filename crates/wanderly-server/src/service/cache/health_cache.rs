//! Reachability of the external API with simple caching.
//!
//! `/health` is polled by load balancers, so the upstream round-trip is
//! cached for a short TTL instead of running on every probe.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use wanderly_reqwest::{ApiClient, Method, NoCredentials, RequestOptions};

/// Tracing target for health checks.
const TRACING_TARGET: &str = "wanderly_server::service::health";

/// Default cache duration for health checks.
const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct HealthCacheEntry {
    is_healthy: AtomicBool,
    last_check: RwLock<Instant>,
    cache_duration: Duration,
}

impl HealthCacheEntry {
    fn new(cache_duration: Duration) -> Self {
        let last_check = Instant::now()
            .checked_sub(cache_duration)
            .unwrap_or_else(Instant::now);

        Self {
            is_healthy: AtomicBool::new(false),
            last_check: RwLock::new(last_check),
            cache_duration,
        }
    }

    /// Returns the cached value or runs `check_fn` once the TTL has passed.
    async fn get_or_update<F, Fut>(&self, check_fn: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        let now = Instant::now();
        let last_check = *self.last_check.read().await;

        if now.duration_since(last_check) < self.cache_duration
            && self.is_healthy.load(Ordering::Relaxed)
        {
            return true;
        }

        let healthy = check_fn().await;

        self.is_healthy.store(healthy, Ordering::Relaxed);
        *self.last_check.write().await = now;

        healthy
    }

    fn get_cached(&self) -> bool {
        self.is_healthy.load(Ordering::Relaxed)
    }
}

/// Cached reachability of the external API.
///
/// Any HTTP response counts as reachable; only transport failures and
/// 5xx statuses mark the API as down. Unhealthy results are rechecked on
/// the next call.
#[derive(Debug, Clone)]
pub struct HealthCache {
    cache: Arc<HealthCacheEntry>,
}

impl HealthCache {
    /// Creates a health cache with the default duration of 30 seconds.
    pub fn new() -> Self {
        Self::with_cache_duration(DEFAULT_CACHE_DURATION)
    }

    /// Creates a health cache with a custom duration.
    pub fn with_cache_duration(cache_duration: Duration) -> Self {
        Self {
            cache: Arc::new(HealthCacheEntry::new(cache_duration)),
        }
    }

    /// Returns `true` if the external API answered recently.
    pub async fn is_healthy(&self, client: &ApiClient) -> bool {
        self.cache.get_or_update(|| check_api(client)).await
    }

    /// Returns the last cached result without checking.
    pub fn get_cached_health(&self) -> bool {
        self.cache.get_cached()
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn check_api(client: &ApiClient) -> bool {
    let start = Instant::now();
    let result = client
        .request(Method::GET, "", RequestOptions::new(), &NoCredentials)
        .await;

    match result {
        Ok(response) if !response.status().is_server_error() => {
            tracing::debug!(
                target: TRACING_TARGET,
                status = response.status().as_u16(),
                duration_ms = start.elapsed().as_millis(),
                "API health check passed"
            );
            true
        }
        Ok(response) => {
            tracing::warn!(
                target: TRACING_TARGET,
                status = response.status().as_u16(),
                "API health check failed"
            );
            false
        }
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "API is unreachable"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn caches_healthy_result() {
        let entry = HealthCacheEntry::new(Duration::from_secs(60));

        assert!(entry.get_or_update(|| async { true }).await);
        assert!(entry.get_or_update(|| async { false }).await);
        assert!(entry.get_cached());
    }

    #[tokio::test]
    async fn rechecks_after_failure() {
        let entry = HealthCacheEntry::new(Duration::from_secs(60));

        assert!(!entry.get_or_update(|| async { false }).await);
        assert!(entry.get_or_update(|| async { true }).await);
    }

    #[tokio::test]
    async fn expires() {
        let entry = HealthCacheEntry::new(Duration::from_millis(10));
        entry.get_or_update(|| async { true }).await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!entry.get_or_update(|| async { false }).await);
    }

    #[tokio::test]
    async fn unreachable_api_is_unhealthy() -> anyhow::Result<()> {
        let client = ApiClient::new(wanderly_reqwest::ApiConfig::new("http://127.0.0.1:9/api/v1"))?;
        let health = HealthCache::new();

        assert!(!health.is_healthy(&client).await);
        assert!(!health.get_cached_health());
        Ok(())
    }
}
