//! Tag-invalidated cache of read responses from the external API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};
use tokio::sync::RwLock;
use url::form_urlencoded;
use wanderly_reqwest::{Credential, CredentialSource, Method, RawResponse, RequestOptions};

/// Tracing target for response cache operations.
const TRACING_TARGET: &str = "wanderly_server::service::cache";

/// Resource family a cached response belongs to.
///
/// A mutation invalidates every entry carrying one of its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CacheTag {
    Tours,
    TourTypes,
    Divisions,
    Bookings,
    Reviews,
    Stats,
    Users,
    Subscriptions,
}

/// Identity of a cached response.
///
/// Responses are scoped to the session that requested them: the key holds
/// a digest of the access token, never the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a request made with `credentials`.
    pub fn new(
        method: &Method,
        endpoint: &str,
        options: &RequestOptions,
        credentials: &dyn CredentialSource,
    ) -> Self {
        let scope = credentials
            .credential(Credential::AccessToken)
            .map(|token| hex::encode(&Sha256::digest(token.as_bytes())[..12]))
            .unwrap_or_else(|| "anonymous".to_owned());

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(options.query())
            .finish();

        Self(format!("{method} {endpoint}?{query} @{scope}"))
    }

    /// Returns the key as text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
struct CacheEntry {
    response: RawResponse,
    tags: Vec<CacheTag>,
    stored_at: Instant,
}

/// Shared cache of successful read responses.
///
/// Clones share the same storage. A zero TTL disables caching.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        tracing::info!(
            target: TRACING_TARGET,
            ttl_secs = ttl.as_secs(),
            "Response cache initialized"
        );

        Self {
            entries: Arc::default(),
            ttl,
        }
    }

    /// Returns `true` when caching is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns a fresh response for `key`, if one is stored.
    pub async fn get(&self, key: &CacheKey) -> Option<RawResponse> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }

        tracing::trace!(target: TRACING_TARGET, key = key.as_str(), "Cache hit");
        Some(entry.response.clone())
    }

    /// Stores `response` under `key` with the given tags.
    ///
    /// Untagged or unsuccessful responses are not stored.
    pub async fn insert(&self, key: CacheKey, tags: &[CacheTag], response: &RawResponse) {
        if !self.is_enabled() || tags.is_empty() || !response.is_success() {
            return;
        }

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                response: response.clone(),
                tags: tags.to_vec(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry carrying any of `tags`.
    pub async fn invalidate(&self, tags: &[CacheTag]) {
        if tags.is_empty() {
            return;
        }

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));

        tracing::debug!(
            target: TRACING_TARGET,
            tags = ?tags,
            removed = before - entries.len(),
            "Cache invalidated"
        );
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Returns the number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
