//! Failures of a decoded API call.

use wanderly_reqwest::StatusCode;

use crate::validation::FieldErrors;

/// Why an API call did not produce usable data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The API answered 401.
    #[error("{message}")]
    Unauthorized { message: String },
    /// The refresh token was missing or rejected; both cookies are gone.
    #[error("Your session has expired. Please log in again")]
    SessionExpired,
    /// The API rejected the request, by status or by `success: false`.
    #[error("{message}")]
    Remote {
        status: StatusCode,
        message: String,
        errors: FieldErrors,
    },
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] wanderly_reqwest::Error),
    /// A successful status with a body that is not the expected envelope.
    #[error("{message}")]
    Decode { status: StatusCode, message: String },
}

impl FetchError {
    /// Returns `true` for [`FetchError::Unauthorized`].
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the upstream status, when a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Remote { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::SessionExpired | Self::Transport(_) => None,
        }
    }
}
