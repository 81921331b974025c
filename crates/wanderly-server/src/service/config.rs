use std::time::Duration;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use wanderly_reqwest::{ApiClient, ApiConfig};

use crate::extract::{CookieSettings, SameSite};
use crate::service::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Access token cookie lifetime: one day.
    pub const ACCESS_TOKEN_MAX_AGE_SECS: u64 = 24 * 60 * 60;

    /// Refresh token cookie lifetime: thirty days.
    pub const REFRESH_TOKEN_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

    /// How long cached read responses stay fresh.
    pub const RESPONSE_CACHE_TTL_SECS: u64 = 60;
}

/// Deployment environment.
///
/// Production turns on the `Secure` cookie attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Returns `true` for production deployments.
    #[inline]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// `SameSite` policy applied to session cookies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// External API client configuration.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[builder(default)]
    pub api: ApiConfig,

    /// Deployment environment.
    #[cfg_attr(
        feature = "config",
        arg(long = "environment", env = "APP_ENV", value_enum, default_value = "development")
    )]
    #[builder(default)]
    pub environment: Environment,

    /// `SameSite` attribute of the session cookies.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "COOKIE_SAME_SITE", value_enum, default_value = "lax")
    )]
    #[builder(default)]
    pub cookie_same_site: SameSitePolicy,

    /// Lifetime of the access token cookie in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ACCESS_TOKEN_MAX_AGE", default_value_t = defaults::ACCESS_TOKEN_MAX_AGE_SECS)
    )]
    #[builder(default = "defaults::ACCESS_TOKEN_MAX_AGE_SECS")]
    pub access_token_max_age: u64,

    /// Lifetime of the refresh token cookie in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REFRESH_TOKEN_MAX_AGE", default_value_t = defaults::REFRESH_TOKEN_MAX_AGE_SECS)
    )]
    #[builder(default = "defaults::REFRESH_TOKEN_MAX_AGE_SECS")]
    pub refresh_token_max_age: u64,

    /// Freshness window of cached read responses in seconds. Zero disables caching.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "RESPONSE_CACHE_TTL", default_value_t = defaults::RESPONSE_CACHE_TTL_SECS)
    )]
    #[builder(default = "defaults::RESPONSE_CACHE_TTL_SECS")]
    pub response_cache_ttl: u64,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Creates the external API client.
    pub fn create_api_client(&self) -> Result<ApiClient> {
        ApiClient::new(self.api.clone()).map_err(|e| {
            Error::config(format!("Failed to create API client for {}", self.api.base_url))
                .with_source(e)
        })
    }

    /// Returns the cookie attributes derived from this configuration.
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            secure: self.environment.is_production(),
            same_site: self.cookie_same_site.into(),
            access_max_age: Duration::from_secs(self.access_token_max_age),
            refresh_max_age: Duration::from_secs(self.refresh_token_max_age),
        }
    }

    /// Returns the response cache freshness window.
    #[must_use]
    pub const fn response_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.response_cache_ttl)
    }
}

impl ServiceConfigBuilder {
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(api) = &builder.api {
            let base_url = api.base_url.as_str();
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if builder.access_token_max_age == Some(0) {
            return Err("Access token max age must be greater than 0".to_string());
        }

        if builder.refresh_token_max_age == Some(0) {
            return Err("Refresh token max age must be greater than 0".to_string());
        }

        // Browsers drop SameSite=None cookies that are not Secure.
        if builder.cookie_same_site == Some(SameSitePolicy::None)
            && !builder.environment.unwrap_or_default().is_production()
        {
            return Err("SameSite=None cookies require the production environment".to_string());
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            environment: Environment::default(),
            cookie_same_site: SameSitePolicy::default(),
            access_token_max_age: defaults::ACCESS_TOKEN_MAX_AGE_SECS,
            refresh_token_max_age: defaults::REFRESH_TOKEN_MAX_AGE_SECS,
            response_cache_ttl: defaults::RESPONSE_CACHE_TTL_SECS,
        }
    }
}
