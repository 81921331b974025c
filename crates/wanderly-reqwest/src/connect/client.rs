//! Reqwest-based HTTP client for the backend API.

use std::sync::Arc;

use reqwest::header::COOKIE;
use reqwest::{Client, Method};
use url::Url;

use super::ApiConfig;
use crate::error::{Error, Result};
use crate::request::{CredentialSource, RawResponse, RequestOptions};

/// Tracing target for API client operations.
pub const TRACING_TARGET: &str = "wanderly_reqwest::client";

/// Inner client that holds the HTTP client and configuration.
struct ApiClientInner {
    http: Client,
    base_url: Url,
    config: ApiConfig,
}

/// HTTP client for the backend REST API.
///
/// Every request goes to `{base}/{endpoint}`. The credential selected by
/// [`RequestOptions::credential`] is looked up in the caller's
/// [`CredentialSource`] and, when present, sent as `Cookie: <name>=<value>`.
/// The body is never decoded here and a non-2xx status is not an error.
///
/// # Examples
///
/// ```rust,ignore
/// use wanderly_reqwest::{ApiClient, ApiConfig, Method, RequestOptions};
///
/// let client = ApiClient::new(ApiConfig::new("http://localhost:5000/api/v1"))?;
/// let options = RequestOptions::json(&serde_json::json!({ "tour": id, "numberOfPeople": 2 }))?;
/// let response = client.request(Method::POST, "booking", options, &tokens).await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new API client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = config.timeout();
        let user_agent = config.effective_user_agent();
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Creating API client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let inner = ApiClientInner {
            http,
            base_url,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Returns the absolute URL for an endpoint relative to the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    /// Sends a request to `endpoint` and returns the undecoded response.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures: invalid URL, connection
    /// failure, timeout, or a body that could not be read.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
        credentials: &dyn CredentialSource,
    ) -> Result<RawResponse> {
        let url = self.endpoint_url(endpoint)?;
        let credential = options.credential();

        let mut request = self.inner.http.request(method.clone(), url);

        if !options.query().is_empty() {
            request = request.query(options.query());
        }

        for (name, value) in options.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        let token = credentials.credential(credential);
        if let Some(token) = token {
            request = request.header(COOKIE, format!("{}={token}", credential.cookie_name()));
        }

        if let Some(body) = options.body() {
            request = request.json(body);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            endpoint,
            credential = %credential,
            authenticated = token.is_some(),
            "Sending API request"
        );

        let response = request.send().await.map_err(|err| {
            let err = Error::from(err);
            tracing::warn!(
                target: TRACING_TARGET,
                method = %method,
                endpoint,
                error = %err,
                "API request failed"
            );
            err
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            endpoint,
            status = status.as_u16(),
            body_len = body.len(),
            "API request completed"
        );

        Ok(RawResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::Json;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::request::{Credential, NoCredentials};

    async fn echo(headers: HeaderMap) -> Json<Value> {
        let cookie = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "success": true, "data": { "cookie": cookie } }))
    }

    async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "success": true, "data": body }))
    }

    async fn rejected() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Tour is full" })),
        )
    }

    async fn spawn_api() -> anyhow::Result<ApiClient> {
        let router = Router::new()
            .route("/api/v1/echo", get(echo))
            .route("/api/v1/body", post(echo_body))
            .route("/api/v1/rejected", post(rejected));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, router).await });

        let config = ApiConfig::new(format!("http://{addr}/api/v1/"));
        Ok(ApiClient::new(config)?)
    }

    fn tokens() -> HashMap<Credential, String> {
        HashMap::from([
            (Credential::AccessToken, "access-1".to_string()),
            (Credential::RefreshToken, "refresh-1".to_string()),
        ])
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(ApiConfig::default()).unwrap();
        assert!(client.config().user_agent.is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new(ApiConfig::new("not a url")).is_err());
    }

    #[test]
    fn test_endpoint_join() {
        let client = ApiClient::new(ApiConfig::new("https://api.example.com/api/v1/")).unwrap();
        let url = client.endpoint_url("/tour/abc").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/tour/abc");
        let url = client.endpoint_url("booking").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/booking");
    }

    #[tokio::test]
    async fn attaches_access_token_cookie() -> anyhow::Result<()> {
        let client = spawn_api().await?;
        let response = client
            .request(Method::GET, "echo", RequestOptions::new(), &tokens())
            .await?;

        let body: Value = response.json()?;
        assert_eq!(body["data"]["cookie"], json!("accessToken=access-1"));
        Ok(())
    }

    #[tokio::test]
    async fn attaches_refresh_token_when_selected() -> anyhow::Result<()> {
        let client = spawn_api().await?;
        let options = RequestOptions::new().with_refresh_token();
        let response = client
            .request(Method::GET, "echo", options, &tokens())
            .await?;

        let body: Value = response.json()?;
        assert_eq!(body["data"]["cookie"], json!("refreshToken=refresh-1"));
        Ok(())
    }

    #[tokio::test]
    async fn sends_without_cookie_when_unauthenticated() -> anyhow::Result<()> {
        let client = spawn_api().await?;
        let response = client
            .request(Method::GET, "echo", RequestOptions::new(), &NoCredentials)
            .await?;

        assert!(response.is_success());
        let body: Value = response.json()?;
        assert_eq!(body["data"]["cookie"], Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn forwards_json_body() -> anyhow::Result<()> {
        let client = spawn_api().await?;
        let options = RequestOptions::json(&json!({ "numberOfPeople": 3 }))?;
        let response = client
            .request(Method::POST, "body", options, &NoCredentials)
            .await?;

        let body: Value = response.json()?;
        assert_eq!(body["data"]["numberOfPeople"], json!(3));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_not_an_error() -> anyhow::Result<()> {
        let client = spawn_api().await?;
        let response = client
            .request(Method::POST, "rejected", RequestOptions::new(), &NoCredentials)
            .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json()?;
        assert_eq!(body["message"], json!("Tour is full"));
        Ok(())
    }

    #[tokio::test]
    async fn network_failure_is_an_error() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = ApiConfig::new(format!("http://{addr}/api/v1"))
            .with_timeout(Duration::from_secs(2));
        let client = ApiClient::new(config)?;
        let result = client
            .request(Method::GET, "echo", RequestOptions::new(), &NoCredentials)
            .await;

        assert!(result.is_err());
        Ok(())
    }
}
