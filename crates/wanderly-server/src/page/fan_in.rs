//! Aggregation of concurrent reads.

use wanderly_reqwest::Credential;

use super::{FALLBACK_MESSAGE, LOGIN_PATH, Page, TRACING_TARGET};
use crate::extract::Session;
use crate::service::{ApiSuccess, FetchError, IssuedTokens};

/// Collects the results of one fan-out.
///
/// Remembers whether any branch was rejected as unauthorized, the first
/// required failure, and every token the API issued along the way.
#[derive(Debug, Default)]
pub(crate) struct FanIn {
    unauthorized: bool,
    failure: Option<String>,
    issued: IssuedTokens,
}

/// What a page does after a fan-out.
#[derive(Debug, PartialEq)]
pub(crate) enum Settled {
    /// Every required branch succeeded.
    Ready,
    /// The session was refreshed; run the fan-out again.
    Retry,
    Halt(Halt),
}

/// A page outcome without a view.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Halt {
    Unavailable(String),
    Redirect(String),
}

impl<T> From<Halt> for Page<T> {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Unavailable(message) => Page::Unavailable { message },
            Halt::Redirect(location) => Page::Redirect { location },
        }
    }
}

impl FanIn {
    pub fn new() -> Self {
        Self::default()
    }

    fn record<T>(&mut self, result: Result<ApiSuccess<T>, FetchError>) -> Result<T, FetchError> {
        match result {
            Ok(success) => {
                self.issued.merge(success.issued);
                Ok(success.data)
            }
            Err(err) => {
                self.unauthorized |= err.is_unauthorized();
                Err(err)
            }
        }
    }

    /// Takes the data of a branch the page cannot render without.
    pub fn required<T>(
        &mut self,
        branch: &'static str,
        result: Result<ApiSuccess<T>, FetchError>,
    ) -> Option<T> {
        match self.record(result) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    branch,
                    error = %err,
                    "Required read failed"
                );
                self.failure.get_or_insert_with(|| FALLBACK_MESSAGE.to_owned());
                None
            }
        }
    }

    /// Takes the data of a branch that renders empty on failure.
    pub fn optional<T: Default>(
        &mut self,
        branch: &'static str,
        result: Result<ApiSuccess<T>, FetchError>,
    ) -> T {
        self.record(result).unwrap_or_else(|err| {
            tracing::warn!(
                target: TRACING_TARGET,
                branch,
                error = %err,
                "Optional read failed, rendering empty"
            );
            T::default()
        })
    }

    /// Decides what the page does next.
    ///
    /// On the first attempt an unauthorized branch triggers one refresh
    /// and a retry. Tokens issued by any branch are stored in the session.
    pub async fn settle(self, session: &mut Session, attempt: u8) -> Settled {
        session.persist(&self.issued);

        if self.unauthorized {
            if attempt > 0 || session.tokens().get(Credential::RefreshToken).is_none() {
                session.sign_out();
                return Settled::Halt(Halt::Redirect(LOGIN_PATH.to_owned()));
            }

            return match session.refresh().await {
                Ok(()) => Settled::Retry,
                Err(FetchError::Transport(_)) => {
                    Settled::Halt(Halt::Unavailable(FALLBACK_MESSAGE.to_owned()))
                }
                Err(_) => Settled::Halt(Halt::Redirect(LOGIN_PATH.to_owned())),
            };
        }

        match self.failure {
            Some(message) => Settled::Halt(Halt::Unavailable(message)),
            None => Settled::Ready,
        }
    }
}
