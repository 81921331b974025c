//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Session: rejects requests without session cookies on private routes
//! - Security: CORS, security headers, compression, body limits
//! - Observability: request IDs, HTTP spans, request logging
//! - Recovery: panics and timeouts
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use wanderly_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_request_logging()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod authentication;
mod observability;
mod recovery;
mod route_category;
mod security;

pub use authentication::{RouterAuthExt, require_session};
pub use observability::{RouterObservabilityExt, log_request};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use route_category::RouteCategory;
pub use security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};

/// Tracing target for session middleware.
pub const TRACING_TARGET_AUTH: &str = "wanderly_server::middleware::auth";
