//! [`ActionResult`] and its failure half.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::ser::{Serialize, Serializer};

use super::TRACING_TARGET;
use crate::model::Meta;
use crate::service::{ApiSuccess, FetchError};
use crate::validation::{FieldErrors, FormValues};

/// Message of every validation failure.
const VALIDATION_MESSAGE: &str = "Validation failed";

/// Message shown when the external API cannot be reached.
const TRANSPORT_MESSAGE: &str = "Unable to reach the booking service. Please try again later";

/// Where an unauthenticated caller is sent.
const LOGIN_PATH: &str = "/login";

/// Why an action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input was rejected locally; nothing was sent.
    Validation,
    /// No usable session.
    Authentication,
    /// The external API rejected the request.
    Remote,
    /// The external API could not be reached or answered nonsense.
    Transport,
}

/// A failed action.
///
/// Always carries a non-empty message.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFailure {
    pub kind: FailureKind,
    /// Upstream status for remote failures.
    pub status: Option<StatusCode>,
    pub message: String,
    pub errors: FieldErrors,
    /// Submitted values to re-populate the form, passwords removed.
    pub values: Option<FormValues>,
    pub redirect: Option<String>,
}

impl ActionFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            errors: FieldErrors::new(),
            values: None,
            redirect: None,
        }
    }

    /// Local validation failure echoing `values` minus any password.
    pub fn validation(errors: FieldErrors, values: &FormValues) -> Self {
        Self {
            errors,
            ..Self::new(FailureKind::Validation, VALIDATION_MESSAGE)
        }
        .with_values(values)
    }

    /// Missing or rejected session; redirects to the login page.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self {
            redirect: Some(LOGIN_PATH.to_owned()),
            ..Self::new(FailureKind::Authentication, message)
        }
    }

    /// Echoes the submitted values with every password-like key removed.
    #[must_use]
    pub fn with_values(mut self, values: &FormValues) -> Self {
        let redacted = values
            .iter()
            .filter(|(key, _)| !key.to_ascii_lowercase().contains("password"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.values = Some(redacted);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the HTTP status the failure is rendered with.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::Authentication => StatusCode::UNAUTHORIZED,
            FailureKind::Remote => self
                .status
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::BAD_REQUEST),
            FailureKind::Transport => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<FetchError> for ActionFailure {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized { message } => Self::authentication(message),
            FetchError::SessionExpired => Self::authentication(err.to_string()),
            FetchError::Remote {
                status,
                message,
                errors,
            } => Self {
                status: Some(status),
                errors,
                ..Self::new(FailureKind::Remote, message)
            },
            FetchError::Transport(source) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = &source as &dyn std::error::Error,
                    "External API unreachable"
                );
                Self::new(FailureKind::Transport, TRANSPORT_MESSAGE)
            }
            FetchError::Decode { status, message } => {
                tracing::error!(
                    target: TRACING_TARGET,
                    status = status.as_u16(),
                    detail = %message,
                    "External API returned an unexpected body"
                );
                Self {
                    status: Some(status),
                    ..Self::new(FailureKind::Transport, "Unexpected response from the booking service")
                }
            }
        }
    }
}

/// Outcome of a server action: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ActionResult<T> {
    Success {
        data: Option<T>,
        message: Option<String>,
        meta: Option<Meta>,
    },
    Failure(ActionFailure),
}

impl<T> ActionResult<T> {
    /// Success carrying `data`.
    pub fn success(data: T) -> Self {
        Self::Success {
            data: Some(data),
            message: None,
            meta: None,
        }
    }

    /// Success without data.
    pub fn done(message: impl Into<String>) -> Self {
        Self::Success {
            data: None,
            message: Some(message.into()),
            meta: None,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the data of a success.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&ActionFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Returns the message of either outcome.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Failure(failure) => Some(&failure.message),
        }
    }

    /// Maps the data of a success.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success {
                data,
                message,
                meta,
            } => ActionResult::Success {
                data: data.map(f),
                message,
                meta,
            },
            Self::Failure(failure) => ActionResult::Failure(failure),
        }
    }

    /// Returns the HTTP status the result is rendered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success { .. } => StatusCode::OK,
            Self::Failure(failure) => failure.status_code(),
        }
    }
}

impl<T> From<ApiSuccess<T>> for ActionResult<T> {
    fn from(success: ApiSuccess<T>) -> Self {
        Self::Success {
            data: Some(success.data),
            message: success.message,
            meta: success.meta,
        }
    }
}

impl<T> From<ActionFailure> for ActionResult<T> {
    fn from(failure: ActionFailure) -> Self {
        Self::Failure(failure)
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<&'a FormValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_to: Option<&'a str>,
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            Self::Success {
                data,
                message,
                meta,
            } => Envelope {
                success: true,
                message: message.as_deref(),
                data: data.as_ref(),
                errors: None,
                meta: meta.as_ref(),
                values: None,
                redirect_to: None,
            },
            Self::Failure(failure) => Envelope {
                success: false,
                message: Some(&failure.message),
                data: None,
                errors: (!failure.errors.is_empty()).then_some(&failure.errors),
                meta: None,
                values: failure.values.as_ref(),
                redirect_to: failure.redirect.as_deref(),
            },
        };

        envelope.serialize(serializer)
    }
}

impl<T: Serialize> IntoResponse for ActionResult<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
