//! Application state and dependency injection.

mod cache;
mod config;
mod gateway;

use wanderly_reqwest::ApiClient;

pub use crate::extract::CookieSettings;
pub use crate::service::cache::{CacheKey, CacheTag, HealthCache, ResponseCache};
pub use crate::service::config::{
    Environment, SameSitePolicy, ServiceConfig, ServiceConfigBuilder,
};
pub use crate::service::gateway::{ApiCall, ApiGateway, ApiSuccess, FetchError, IssuedTokens};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Holds only
/// process-wide services: credentials live in the per-request [`Session`].
///
/// [`State`]: axum::extract::State
/// [`Session`]: crate::extract::Session
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub api_client: ApiClient,

    // Internal services:
    pub api_gateway: ApiGateway,
    pub cookie_settings: CookieSettings,
    pub health_cache: HealthCache,
}

impl ServiceState {
    /// Initializes application state from configuration.
    pub fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let api_client = service_config.create_api_client()?;
        let response_cache = ResponseCache::new(service_config.response_cache_ttl());

        let service_state = Self {
            api_gateway: ApiGateway::new(api_client.clone(), response_cache),
            api_client,

            cookie_settings: service_config.cookie_settings(),
            health_cache: HealthCache::new(),
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(api_client: ApiClient);

// Internal services:
impl_di!(api_gateway: ApiGateway);
impl_di!(cookie_settings: CookieSettings);
impl_di!(health_cache: HealthCache);

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use wanderly_reqwest::ApiConfig;

    use super::*;

    #[test]
    fn state_from_config() -> anyhow::Result<()> {
        let config = ServiceConfig::builder()
            .with_api(ApiConfig::new("http://127.0.0.1:5000/api/v1"))
            .with_environment(Environment::Production)
            .build()?;
        let state = ServiceState::from_config(&config)?;

        assert!(CookieSettings::from_ref(&state).secure);
        assert_eq!(
            ApiClient::from_ref(&state).config().base_url,
            "http://127.0.0.1:5000/api/v1"
        );
        Ok(())
    }
}
