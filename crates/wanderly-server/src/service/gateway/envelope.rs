//! Decoding of the external API's JSON envelope.
//!
//! Success: `{ success: true, message, data, meta }`.
//! Failure: `{ success: false, message, errorSources: [{ path, message }] }`.

use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wanderly_reqwest::{Credential, RawResponse, StatusCode};

use super::FetchError;
use crate::model::Meta;
use crate::validation::FieldErrors;

/// Data of a successful call plus any tokens the API handed out with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    pub data: T,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub issued: IssuedTokens,
}

/// Tokens issued by the API through `Set-Cookie` or in the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl IssuedTokens {
    /// Returns `true` when no token was issued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Returns the issued value for `credential`.
    pub fn get(&self, credential: Credential) -> Option<&str> {
        match credential {
            Credential::AccessToken => self.access.as_deref(),
            Credential::RefreshToken => self.refresh.as_deref(),
        }
    }

    /// Takes every token `other` carries.
    pub fn merge(&mut self, other: IssuedTokens) {
        if other.access.is_some() {
            self.access = other.access;
        }
        if other.refresh.is_some() {
            self.refresh = other.refresh;
        }
    }

    fn set(&mut self, credential: Credential, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match credential {
            Credential::AccessToken => &mut self.access,
            Credential::RefreshToken => &mut self.refresh,
        };
        *slot = Some(value.to_owned());
    }

    /// Collects tokens from `Set-Cookie` headers, then from the body.
    ///
    /// Body tokens are read from the top level and from `data`.
    pub fn from_response(response: &RawResponse, body: Option<&Value>) -> Self {
        let mut issued = Self::default();

        for header in response.set_cookies() {
            let Ok(cookie) = Cookie::parse(header) else {
                continue;
            };
            if let Some(credential) = Credential::from_cookie_name(cookie.name()) {
                issued.set(credential, cookie.value());
            }
        }

        let Some(body) = body else {
            return issued;
        };

        for scope in [Some(body), body.get("data")].into_iter().flatten() {
            for credential in Credential::ALL {
                if issued.get(credential).is_some() {
                    continue;
                }
                if let Some(token) = scope.get(credential.cookie_name()).and_then(Value::as_str) {
                    issued.set(credential, token);
                }
            }
        }

        issued
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    error_sources: Vec<ErrorSource>,
}

#[derive(Debug, Deserialize)]
struct ErrorSource {
    #[serde(default)]
    path: Value,
    #[serde(default)]
    message: String,
}

fn field_errors(sources: &[ErrorSource]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for source in sources {
        let path = match &source.path {
            Value::String(path) => path.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if !path.is_empty() && !source.message.is_empty() {
            errors.push(&path, source.message.as_str());
        }
    }
    errors
}

fn status_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}

/// Turns a raw response into data or a [`FetchError`].
///
/// Both a non-2xx status and `success: false` count as failure.
pub(crate) fn decode<T: DeserializeOwned>(
    response: &RawResponse,
) -> Result<ApiSuccess<T>, FetchError> {
    let status = response.status();
    let body: Option<Value> = if response.body().is_empty() {
        None
    } else {
        response.json().ok()
    };
    let envelope: Option<Envelope> = body
        .clone()
        .and_then(|body| serde_json::from_value(body).ok());

    if status == StatusCode::UNAUTHORIZED {
        let message = envelope
            .and_then(|e| e.message)
            .unwrap_or_else(|| "You are not logged in".to_owned());
        return Err(FetchError::Unauthorized { message });
    }

    let issued = IssuedTokens::from_response(response, body.as_ref());

    let Some(envelope) = envelope else {
        if status.is_success() {
            return Err(FetchError::Decode {
                status,
                message: "Unexpected response from the server".to_owned(),
            });
        }
        return Err(FetchError::Remote {
            status,
            message: status_message(status),
            errors: FieldErrors::new(),
        });
    };

    if !status.is_success() || envelope.success == Some(false) {
        let errors = field_errors(&envelope.error_sources);
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status_message(status));
        return Err(FetchError::Remote {
            status,
            message,
            errors,
        });
    }

    let data = serde_json::from_value(envelope.data).map_err(|err| FetchError::Decode {
        status,
        message: format!("Unexpected response data: {err}"),
    })?;

    Ok(ApiSuccess {
        data,
        message: envelope.message,
        meta: envelope.meta,
        issued,
    })
}
