//! Custom routes utilities for extending the router.

use axum::Router;

use crate::service::ServiceState;

/// Transformation applied to a router before it is merged.
pub type RouterMapFn = fn(Router<ServiceState>) -> Router<ServiceState>;

/// Extra routes merged next to the built-in ones.
///
/// Private routes sit behind the session check, public routes do not.
///
/// # Examples
///
/// ```rust,ignore
/// use axum::Router;
/// use axum::routing::get;
/// use wanderly_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new()
///     .with_public_routes(Router::new().route("/about", get(|| async { "about" })));
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    /// Routes that require a session.
    pub private_routes: Option<Router<ServiceState>>,
    /// Routes open to everyone.
    pub public_routes: Option<Router<ServiceState>>,
    /// Applied to all private routes after the session check.
    pub private_after_middleware: Option<RouterMapFn>,
    /// Applied to all public routes.
    pub public_after_middleware: Option<RouterMapFn>,
}

impl CustomRoutes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(routes);
        self
    }

    pub fn with_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(routes);
        self
    }

    /// Adds private routes, merging with any already set.
    pub fn add_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(match self.private_routes.take() {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Adds public routes, merging with any already set.
    pub fn add_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(match self.public_routes.take() {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    pub fn with_private_after_middleware(mut self, f: RouterMapFn) -> Self {
        self.private_after_middleware = Some(f);
        self
    }

    pub fn with_public_after_middleware(mut self, f: RouterMapFn) -> Self {
        self.public_after_middleware = Some(f);
        self
    }

    /// Returns true if no custom routes are configured.
    pub fn is_empty(&self) -> bool {
        self.private_routes.is_none() && self.public_routes.is_none()
    }

    pub(crate) fn map_private_after_middleware(
        &self,
        routes: Router<ServiceState>,
    ) -> Router<ServiceState> {
        match self.private_after_middleware {
            Some(f) => f(routes),
            None => routes,
        }
    }

    pub(crate) fn map_public_after_middleware(
        &self,
        routes: Router<ServiceState>,
    ) -> Router<ServiceState> {
        match self.public_after_middleware {
            Some(f) => f(routes),
            None => routes,
        }
    }
}
