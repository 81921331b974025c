//! Configuration for the API client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Hosted backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.wanderly.travel/api/v1";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the backend API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ApiConfig {
    /// Base URL of the backend REST API, without a trailing slash.
    #[cfg_attr(
        feature = "config",
        arg(long = "api-base-url", env = "API_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    pub base_url: String,

    /// Request timeout in seconds. Zero falls back to the default.
    #[cfg_attr(
        feature = "config",
        arg(long = "api-timeout", env = "API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)
    )]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[cfg_attr(feature = "config", arg(long = "api-user-agent", env = "API_USER_AGENT"))]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective timeout, using default if zero.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using default if unset or empty.
    #[must_use]
    pub fn effective_user_agent(&self) -> String {
        match self.user_agent.as_deref() {
            Some(agent) if !agent.is_empty() => agent.to_string(),
            _ => format!("wanderly/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
