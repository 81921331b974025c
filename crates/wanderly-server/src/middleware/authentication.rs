//! Session middleware for routes that need a signed-in visitor.

use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};

use super::TRACING_TARGET_AUTH;
use crate::extract::TokenStore;
use crate::handler::ErrorKind;

/// Extension trait for `axum::`[`Router`] to apply session middleware.
pub trait RouterAuthExt<S> {
    /// Rejects requests that carry neither session cookie.
    ///
    /// Only routes matched by this router are guarded, so unknown paths
    /// still fall through to the not-found fallback.
    fn with_session_required(self) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_session_required(self) -> Self {
        self.route_layer(from_fn(require_session))
    }
}

/// Requires at least one session cookie to proceed with the request.
///
/// An expired access token with a live refresh token passes; the handler's
/// [`Session`] refreshes it. Token validity is decided by the external API.
///
/// [`Session`]: crate::extract::Session
pub async fn require_session(request: Request, next: Next) -> Response {
    let tokens = TokenStore::from_headers(request.headers());
    if !tokens.has_any() {
        tracing::debug!(
            target: TRACING_TARGET_AUTH,
            path = %request.uri().path(),
            "request without session cookies"
        );

        return ErrorKind::MissingAuthToken
            .with_message("Please sign in to continue")
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    fn server() -> anyhow::Result<TestServer> {
        let app = Router::new()
            .route("/private", get(|| async { "ok" }))
            .with_session_required();
        Ok(TestServer::new(app)?)
    }

    #[tokio::test]
    async fn rejects_without_cookies() -> anyhow::Result<()> {
        let server = server()?;
        let response = server.get("/private").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn passes_with_refresh_token_only() -> anyhow::Result<()> {
        let server = server()?;
        let response = server
            .get("/private")
            .add_header("cookie", "refreshToken=r1")
            .await;
        response.assert_status_ok();
        response.assert_text("ok");
        Ok(())
    }
}
