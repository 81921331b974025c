//! Per-request options.

use serde::Serialize;
use serde_json::Value;

use super::Credential;
use crate::error::Result;

/// Options for a single API request.
///
/// The default attaches the access token, sends no body and no extra
/// headers.
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Value>,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    use_refresh_token: bool,
}

impl RequestOptions {
    /// Creates empty options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with a JSON body serialized from `body`.
    pub fn json<T: Serialize + ?Sized>(body: &T) -> Result<Self> {
        Ok(Self::new().with_body(serde_json::to_value(body)?))
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds every pair from `pairs` as query parameters.
    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attaches the refresh token instead of the access token.
    pub fn with_refresh_token(mut self) -> Self {
        self.use_refresh_token = true;
        self
    }

    /// Returns which credential the request carries.
    #[must_use]
    pub fn credential(&self) -> Credential {
        if self.use_refresh_token {
            Credential::RefreshToken
        } else {
            Credential::AccessToken
        }
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the extra headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the query parameters.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}
