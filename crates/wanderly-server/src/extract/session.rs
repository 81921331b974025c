//! Per-request session: the cookie store plus a handle to the API.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wanderly_reqwest::Credential;

use crate::extract::{CookieSettings, TokenClaims, TokenStore};
use crate::service::{ApiCall, ApiGateway, ApiSuccess, FetchError, IssuedTokens};

/// Tracing target for session operations.
pub const TRACING_TARGET: &str = "wanderly_server::extract::session";

/// Endpoint that trades a refresh token for a new access token.
const REFRESH_ENDPOINT: &str = "auth/refresh-token";

/// Request-scoped context for talking to the external API as the caller.
///
/// Owns the request's [`TokenStore`]; nothing about the caller is kept in
/// shared state. Return the session from the handler so cookie changes
/// reach the browser.
///
/// [`Session::fetch`] issues one request and leaves cookies alone, so it
/// can run concurrently. [`Session::send`] refreshes the access token when
/// needed, retries a 401 once and persists any token the API issues.
#[derive(Debug, Clone)]
pub struct Session {
    tokens: TokenStore,
    gateway: ApiGateway,
    cookies: CookieSettings,
    refresh_attempted: bool,
}

impl Session {
    pub fn new(tokens: TokenStore, gateway: ApiGateway, cookies: CookieSettings) -> Self {
        Self {
            tokens,
            gateway,
            cookies,
            refresh_attempted: false,
        }
    }

    #[inline]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    #[inline]
    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Returns `true` when either credential cookie is present.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.has_any()
    }

    /// Decodes the claims of the current access token.
    pub fn claims(&self) -> Option<TokenClaims> {
        self.tokens
            .get(Credential::AccessToken)
            .and_then(TokenClaims::decode)
    }

    /// Returns `true` if a refresh token exists and the access token is
    /// missing or expired.
    pub fn needs_refresh(&self) -> bool {
        if self.tokens.get(Credential::RefreshToken).is_none() {
            return false;
        }

        match self.tokens.get(Credential::AccessToken) {
            None => true,
            Some(token) => TokenClaims::decode(token).is_some_and(|claims| claims.is_expired()),
        }
    }

    /// Performs one call with the current credentials.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        call: &ApiCall,
    ) -> Result<ApiSuccess<T>, FetchError> {
        self.gateway.fetch(call, &self.tokens).await
    }

    /// Performs a call, refreshing the session around it when needed.
    pub async fn send<T: DeserializeOwned>(
        &mut self,
        call: &ApiCall,
    ) -> Result<ApiSuccess<T>, FetchError> {
        if self.needs_refresh() {
            match self.refresh().await {
                Ok(()) | Err(FetchError::SessionExpired) => {}
                Err(err) => return Err(err),
            }
        }

        let result = match self.fetch(call).await {
            Err(err) if err.is_unauthorized() => self.recover(call, err).await,
            other => other,
        };

        if let Ok(success) = &result {
            self.persist(&success.issued);
        }
        result
    }

    async fn recover<T: DeserializeOwned>(
        &mut self,
        call: &ApiCall,
        err: FetchError,
    ) -> Result<ApiSuccess<T>, FetchError> {
        if self.refresh_attempted || self.tokens.get(Credential::RefreshToken).is_none() {
            self.tokens.delete(Credential::AccessToken);
            return Err(err);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = call.endpoint(),
            "Access token rejected, refreshing"
        );

        self.refresh().await?;
        self.fetch(call).await
    }

    /// Trades the refresh token for a new access token.
    ///
    /// A transport failure leaves the cookies as they are. Any other failure
    /// clears both cookies and yields [`FetchError::SessionExpired`].
    pub async fn refresh(&mut self) -> Result<(), FetchError> {
        self.refresh_attempted = true;

        if self.tokens.get(Credential::RefreshToken).is_none() {
            self.tokens.clear();
            return Err(FetchError::SessionExpired);
        }

        let call = ApiCall::post(REFRESH_ENDPOINT).with_refresh_token();
        match self.gateway.fetch::<Value>(&call, &self.tokens).await {
            Ok(success) if success.issued.access.is_some() => {
                self.persist(&success.issued);
                tracing::debug!(target: TRACING_TARGET, "Session refreshed");
                Ok(())
            }
            Ok(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    "Refresh succeeded without issuing an access token"
                );
                self.tokens.clear();
                Err(FetchError::SessionExpired)
            }
            Err(FetchError::Transport(err)) => Err(FetchError::Transport(err)),
            Err(err) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Refresh rejected, clearing session"
                );
                self.tokens.clear();
                Err(FetchError::SessionExpired)
            }
        }
    }

    /// Stores every token in `issued` with the configured cookie attributes.
    pub fn persist(&mut self, issued: &IssuedTokens) {
        for credential in Credential::ALL {
            if let Some(value) = issued.get(credential) {
                let options = self.cookies.options(credential);
                self.tokens.set(credential, value, &options);
            }
        }
    }

    /// Deletes both credential cookies.
    pub fn sign_out(&mut self) {
        self.tokens.clear();
    }
}

impl<S> FromRequestParts<S> for Session
where
    ApiGateway: FromRef<S>,
    CookieSettings: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenStore::from_headers(&parts.headers);
        Ok(Self::new(
            tokens,
            ApiGateway::from_ref(state),
            CookieSettings::from_ref(state),
        ))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.tokens.into_response_parts(res)
    }
}
