//! Page and dashboard composition.
//!
//! A page fans out several independent reads against the external API,
//! waits for all of them and either renders, falls back to an error panel
//! or redirects. Each read is required or optional: a failed required read
//! replaces the whole page with [`Page::Unavailable`], a failed optional read
//! renders as an empty default.

mod catalogue;
mod dashboard;
mod fan_in;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use serde_json::json;
use url::form_urlencoded;

pub use self::catalogue::{Catalogue, TourDetail, catalogue, tour_detail};
pub use self::dashboard::{
    AdminDashboard, HostDashboard, TouristDashboard, admin_dashboard, host_dashboard,
    tourist_dashboard,
};
pub(crate) use self::fan_in::{FanIn, Halt, Settled};
use crate::extract::{Session, TokenClaims};
use crate::model::Role;
use crate::service::FetchError;

/// Tracing target for page composition.
pub const TRACING_TARGET: &str = "wanderly_server::page";

/// Where signed-out visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Message of the fallback panel.
pub const FALLBACK_MESSAGE: &str = "We couldn't load this page right now. Please try again later.";

/// A composed page.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Page<T> {
    /// Every required read succeeded.
    Ready(T),
    /// A required read failed; render the fallback panel.
    Unavailable { message: String },
    /// The visitor belongs elsewhere.
    Redirect { location: String },
}

impl<T> Page<T> {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    /// Redirect to the login page that comes back to `path` afterwards.
    pub fn login(path: &str) -> Self {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", path)
            .finish();
        Self::redirect(format!("{LOGIN_PATH}?{query}"))
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns the rendered view model, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(view) => Some(view),
            _ => None,
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ready(view) => {
                Json(json!({ "success": true, "data": view })).into_response()
            }
            Self::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "message": message, "fallback": true })),
            )
                .into_response(),
            Self::Redirect { location } => Redirect::to(&location).into_response(),
        }
    }
}

/// Admits only signed-in visitors with `role`.
///
/// Refreshes an expired access token first. Visitors without a session go
/// to the login page; visitors with another role go to their own dashboard.
pub(crate) async fn guard<T>(
    session: &mut Session,
    role: Role,
    path: &str,
) -> Result<TokenClaims, Page<T>> {
    if session.needs_refresh() {
        match session.refresh().await {
            Ok(()) => {}
            Err(FetchError::Transport(_)) => return Err(Page::unavailable(FALLBACK_MESSAGE)),
            Err(_) => return Err(Page::login(path)),
        }
    }

    let Some(claims) = session.claims() else {
        return Err(Page::login(path));
    };

    if claims.role != role {
        tracing::debug!(
            target: TRACING_TARGET,
            expected = %role,
            actual = %claims.role,
            "Redirecting to own dashboard"
        );
        return Err(Page::redirect(claims.role.dashboard_path()));
    }

    Ok(claims)
}
