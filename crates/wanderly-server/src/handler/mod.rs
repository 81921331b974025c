//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Action routes answer with the action envelope, page routes with a view
//! model, a fallback panel or a redirect. Routes that need a session sit
//! behind [`require_session`]; dashboards guard themselves so they can
//! redirect instead of failing.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use axum::Router;
//! use axum::routing::get;
//! use wanderly_server::handler::{CustomRoutes, routes};
//! use wanderly_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&ServiceConfig::default())?;
//!
//! let custom_routes = CustomRoutes::new()
//!     .with_public_routes(Router::new().route("/about", get(|| async { "about" })));
//!
//! let app: Router = routes(custom_routes).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`require_session`]: crate::middleware::require_session

mod auth;
mod bookings;
mod error;
mod monitors;
mod pages;
mod response;
mod reviews;
mod subscriptions;
mod tours;
mod users;
mod utils;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::MonitorStatus;
pub(crate) use crate::handler::response::ErrorResponse;
pub use crate::handler::utils::{CustomRoutes, RouterMapFn};
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes that need a session.
fn private_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new()
        .merge(auth::private_routes())
        .merge(users::private_routes())
        .merge(tours::private_routes())
        .merge(bookings::private_routes())
        .merge(reviews::private_routes())
        .merge(subscriptions::private_routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns a [`Router`] with all public routes.
fn public_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new()
        .merge(auth::public_routes())
        .merge(tours::public_routes())
        .merge(pages::routes())
        .merge(monitors::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes(routes: CustomRoutes) -> Router<ServiceState> {
    let private_router = private_routes(routes.private_routes.clone()).with_session_required();
    let private_router = routes.map_private_after_middleware(private_router);

    let public_router = public_routes(routes.public_routes.clone());
    let public_router = routes.map_public_after_middleware(public_router);

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
}
