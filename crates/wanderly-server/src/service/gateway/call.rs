//! Description of a single API call.

use serde::Serialize;
use wanderly_reqwest::{Method, RequestOptions};

use super::FetchError;
use crate::service::CacheTag;

/// Method, endpoint and options of one request to the external API.
///
/// Read calls can opt into the response cache with [`ApiCall::cached`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ApiCall {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    pub(crate) options: RequestOptions,
    pub(crate) tags: Vec<CacheTag>,
}

impl ApiCall {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            options: RequestOptions::new(),
            tags: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Sends `body` as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, FetchError> {
        let body = serde_json::to_value(body).map_err(wanderly_reqwest::Error::from)?;
        self.options = self.options.with_body(body);
        Ok(self)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.with_query(name, value);
        self
    }

    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = self.options.with_query_pairs(pairs);
        self
    }

    /// Sends the refresh token instead of the access token.
    pub fn with_refresh_token(mut self) -> Self {
        self.options = self.options.with_refresh_token();
        self
    }

    /// Caches a successful `GET` response under `tags`.
    pub fn cached(mut self, tags: &[CacheTag]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[inline]
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Returns `true` if the response may be served from the cache.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET && !self.tags.is_empty()
    }
}
