//! Decoded access to the external API.
//!
//! [`ApiGateway`] sits between [`ApiClient`] and the rest of the server: it
//! serves cacheable reads from the [`ResponseCache`], decodes the JSON
//! envelope and reports every failure as a [`FetchError`]. It never touches
//! cookies; the per-request [`Session`] owns those.
//!
//! [`Session`]: crate::extract::Session

mod call;
mod envelope;
mod error;

use serde::de::DeserializeOwned;
use wanderly_reqwest::{ApiClient, CredentialSource};

pub use self::call::ApiCall;
use self::envelope::decode;
pub use self::envelope::{ApiSuccess, IssuedTokens};
pub use self::error::FetchError;
use crate::service::{CacheKey, CacheTag, ResponseCache};

/// Tracing target for gateway operations.
pub const TRACING_TARGET: &str = "wanderly_server::service::gateway";

/// Shared handle to the external API and its response cache.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: ApiClient,
    cache: ResponseCache,
}

impl ApiGateway {
    pub fn new(client: ApiClient, cache: ResponseCache) -> Self {
        Self { client, cache }
    }

    #[inline]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[inline]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Performs `call` with `credentials` and decodes the envelope.
    ///
    /// Does not refresh or persist tokens.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        call: &ApiCall,
        credentials: &dyn CredentialSource,
    ) -> Result<ApiSuccess<T>, FetchError> {
        let key = call.is_cacheable().then(|| {
            CacheKey::new(call.method(), call.endpoint(), call.options(), credentials)
        });

        if let Some(key) = &key
            && let Some(response) = self.cache.get(key).await
        {
            return decode(&response);
        }

        let response = self
            .client
            .request(
                call.method().clone(),
                call.endpoint(),
                call.options().clone(),
                credentials,
            )
            .await?;

        let decoded = decode(&response);

        if let Some(key) = key
            && decoded.is_ok()
            && response.set_cookies().next().is_none()
        {
            self.cache.insert(key, &call.tags, &response).await;
        }

        if let Err(err) = &decoded {
            tracing::debug!(
                target: TRACING_TARGET,
                method = %call.method(),
                endpoint = call.endpoint(),
                status = err.status().map(|s| s.as_u16()),
                error = %err,
                "API call failed"
            );
        }

        decoded
    }

    /// Drops cached responses carrying any of `tags`.
    pub async fn invalidate(&self, tags: &[CacheTag]) {
        self.cache.invalidate(tags).await;
    }
}
