//! Per-request cookie store for the two session credentials.

use std::borrow::Cow;
use std::convert::Infallible;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
pub use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use wanderly_reqwest::{Credential, CredentialSource};

/// Attributes written with a credential cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// How long the browser keeps the cookie.
    pub max_age: Duration,
    /// Hides the cookie from client-side script. Always `true` for credentials.
    pub http_only: bool,
    /// Restricts the cookie to HTTPS.
    pub secure: bool,
    /// Cross-site sending policy.
    pub same_site: SameSite,
    /// Path scope of the cookie.
    pub path: Cow<'static, str>,
}

impl CookieOptions {
    /// Creates HTTP-only, root-scoped options with the given lifetime.
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            path: Cow::Borrowed("/"),
        }
    }
}

/// Cookie attributes shared by every request, derived from the service
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Whether cookies carry the `Secure` attribute.
    pub secure: bool,
    /// `SameSite` attribute.
    pub same_site: SameSite,
    /// Access token cookie lifetime.
    pub access_max_age: Duration,
    /// Refresh token cookie lifetime.
    pub refresh_max_age: Duration,
}

impl CookieSettings {
    /// Returns the options used when writing `credential`.
    pub fn options(&self, credential: Credential) -> CookieOptions {
        let max_age = match credential {
            Credential::AccessToken => self.access_max_age,
            Credential::RefreshToken => self.refresh_max_age,
        };

        CookieOptions {
            secure: self.secure,
            same_site: self.same_site,
            ..CookieOptions::new(max_age)
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
            access_max_age: Duration::from_secs(24 * 60 * 60),
            refresh_max_age: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

/// Request-scoped credential store backed by the request's cookies.
///
/// Reads see the incoming `Cookie` header plus any change made during the
/// request. Changes are sent back as `Set-Cookie` headers when the store is
/// returned as part of the response.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    jar: CookieJar,
}

impl TokenStore {
    /// Creates a store over an existing cookie jar.
    #[inline]
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Creates a store from the request's `Cookie` headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(CookieJar::from_headers(headers))
    }

    /// Returns the credential value, or `None` when it is absent.
    pub fn get(&self, credential: Credential) -> Option<&str> {
        self.jar
            .get(credential.cookie_name())
            .map(Cookie::value)
            .filter(|value| !value.is_empty())
    }

    /// Stores a credential with the given cookie attributes.
    pub fn set(&mut self, credential: Credential, value: impl Into<String>, options: &CookieOptions) {
        let max_age = i64::try_from(options.max_age.as_secs()).unwrap_or(i64::MAX);
        let cookie = Cookie::build((credential.cookie_name(), value.into()))
            .path(options.path.clone().into_owned())
            .http_only(options.http_only)
            .secure(options.secure)
            .same_site(options.same_site)
            .max_age(time::Duration::seconds(max_age));

        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }

    /// Deletes a credential. Deleting an absent credential is a no-op.
    pub fn delete(&mut self, credential: Credential) {
        let removal = Cookie::build((credential.cookie_name(), "")).path("/");
        self.jar = std::mem::take(&mut self.jar).remove(removal);
    }

    /// Deletes both credentials.
    pub fn clear(&mut self) {
        for credential in Credential::ALL {
            self.delete(credential);
        }
    }

    /// Returns `true` when either credential is present.
    pub fn has_any(&self) -> bool {
        Credential::ALL.into_iter().any(|c| self.get(c).is_some())
    }

    /// Returns the underlying cookie jar.
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

impl CredentialSource for TokenStore {
    fn credential(&self, credential: Credential) -> Option<&str> {
        self.get(credential)
    }
}

impl<S> FromRequestParts<S> for TokenStore
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for TokenStore {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}
