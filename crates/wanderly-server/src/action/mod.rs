//! Server actions: validated, authenticated mutations and reads.
//!
//! Every action returns an [`ActionResult`]: either data from the external
//! API, or an [`ActionFailure`] describing what went wrong. Input is
//! validated before anything is sent, and a validation failure never
//! reaches the API.
//!
//! Actions take the request's [`Session`] mutably so refreshed or rotated
//! tokens end up in the response cookies.

/// Unwraps `Ok` or returns the failure from the enclosing action.
macro_rules! try_action {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(failure) => return $crate::action::ActionResult::Failure(failure.into()),
        }
    };
}

pub(crate) use try_action;

pub mod auth;
pub mod bookings;
pub mod reviews;
pub mod subscriptions;
pub mod tours;
pub mod users;

mod result;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use self::result::{ActionFailure, ActionResult, FailureKind};
use crate::extract::Session;
use crate::service::{ApiCall, CacheTag};
use crate::validation::{FieldErrors, FormValues, Schema, validate};

/// Tracing target for server actions.
pub const TRACING_TARGET: &str = "wanderly_server::action";

/// Validates `values` against `schema`.
pub fn parse<T: DeserializeOwned>(schema: &Schema, values: &FormValues) -> Result<T, ActionFailure> {
    validate(schema, values)
        .into_result()
        .map_err(|errors| ActionFailure::validation(errors, values))
}

/// Checks that a path segment can be spliced into an endpoint.
pub fn resource_id<'a>(id: &'a str, resource: &str) -> Result<&'a str, ActionFailure> {
    let id = id.trim();
    let valid = !id.is_empty()
        && !id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'));

    if valid {
        Ok(id)
    } else {
        let errors = FieldErrors::new().with("id", format!("Invalid {resource} id"));
        Err(ActionFailure::validation(errors, &FormValues::new()))
    }
}

/// Builds a call carrying `body` as JSON.
pub(crate) fn with_body<T: Serialize>(call: ApiCall, body: &T) -> Result<ApiCall, ActionFailure> {
    call.with_json(body).map_err(ActionFailure::from)
}

/// Forwards the non-empty `query` parameters named in `allowed`.
pub(crate) fn with_filters(
    call: ApiCall,
    query: &HashMap<String, String>,
    allowed: &[&str],
) -> ApiCall {
    let pairs = allowed.iter().filter_map(|name| {
        let value = query.get(*name)?.trim();
        (!value.is_empty()).then_some((*name, value))
    });
    call.with_query_pairs(pairs)
}

/// Sends `call` through the session and invalidates `tags` on success.
pub async fn submit<T: DeserializeOwned>(
    session: &mut Session,
    call: &ApiCall,
    invalidates: &[CacheTag],
) -> ActionResult<T> {
    match session.send::<T>(call).await {
        Ok(success) => {
            session.gateway().invalidate(invalidates).await;
            ActionResult::from(success)
        }
        Err(err) => ActionResult::Failure(ActionFailure::from(err)),
    }
}

/// Like [`submit`], echoing the submitted `values` back on failure.
pub async fn submit_form<T: DeserializeOwned>(
    session: &mut Session,
    call: &ApiCall,
    invalidates: &[CacheTag],
    values: &FormValues,
) -> ActionResult<T> {
    match submit(session, call, invalidates).await {
        ActionResult::Failure(failure) => failure.with_values(values).into(),
        success => success,
    }
}
