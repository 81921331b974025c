//! Observability middleware: request IDs, HTTP spans and request logging.

use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::http::header;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use super::route_category::RouteCategory;

/// Tracing target for request logging.
const TRACING_TARGET: &str = "wanderly_server::middleware::requests";

/// Header carrying the request identifier.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers [`SetRequestId`], [`Trace`] and [`PropagateRequestId`] middlewares.
    ///
    /// Session cookies and the `Authorization` header are marked sensitive
    /// so they never show up in request spans.
    ///
    /// [`SetRequestId`]: tower_http::request_id::SetRequestIdLayer
    /// [`Trace`]: tower_http::trace::TraceLayer
    /// [`PropagateRequestId`]: tower_http::request_id::PropagateRequestIdLayer
    fn with_observability(self) -> Self;

    /// Logs one line per request with its category, status and duration.
    fn with_request_logging(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
    }

    fn with_request_logging(self) -> Self {
        self.layer(from_fn(log_request))
    }
}

/// Request logging middleware with categorization and timing.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let category = RouteCategory::from_uri(&uri);

    tracing::trace!(
        target: TRACING_TARGET,
        method = %method,
        path = %uri.path(),
        category = category.as_str(),
        "request started"
    );

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::debug!(
        target: TRACING_TARGET,
        method = %method,
        path = %uri.path(),
        category = category.as_str(),
        status = %response.status(),
        duration_ms = duration.as_millis() as u64,
        "request completed"
    );

    response
}
