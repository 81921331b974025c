//! Undecoded API response.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Status, headers and body of an API response, exactly as received.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the HTTP status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` for a 2xx status.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Returns every `Set-Cookie` header value that is valid UTF-8.
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::Value;

    use super::*;

    #[test]
    fn decodes_json_and_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("accessToken=a; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("refreshToken=r; Path=/"));

        let response = RawResponse::new(StatusCode::OK, headers, r#"{"success":true}"#);

        let body: Value = response.json().unwrap();
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(response.set_cookies().count(), 2);
        assert!(response.is_success());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let response = RawResponse::new(StatusCode::BAD_GATEWAY, HeaderMap::new(), "<html>");
        assert!(response.json::<Value>().is_err());
        assert_eq!(response.text(), "<html>");
        assert!(!response.is_success());
    }
}
