//! Request extractors: the session cookies and form bodies.
//!
//! # Session
//!
//! - [`TokenStore`]: the two credential cookies of the current request
//! - [`Session`]: the token store plus the API gateway, with refresh logic
//! - [`TokenClaims`]: unverified payload of the access token
//!
//! # Request data
//!
//! - [`FormInput`]: JSON object or URL-encoded form, before validation
//! - [`Path`], [`Query`]: envelope-shaped rejections

mod claims;
mod reject;
mod session;
mod token_store;

#[cfg(test)]
pub(crate) use self::claims::encode_test_token;
pub use self::claims::TokenClaims;
pub use self::reject::{FormInput, MAX_FORM_PAYLOAD_SIZE, Path, Query};
pub use self::session::Session;
#[cfg(test)]
pub(crate) use self::session::tests::session as test_session;
pub use self::token_store::{CookieOptions, CookieSettings, SameSite, TokenStore};
