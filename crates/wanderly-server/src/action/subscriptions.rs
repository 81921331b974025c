//! Subscription plans.

use axum::http::StatusCode;

use super::{ActionFailure, ActionResult, parse, submit, submit_form, try_action, with_body};
use crate::extract::Session;
use crate::model::Subscription;
use crate::service::{ApiCall, CacheTag, FetchError};
use crate::validation::{FormValues, SubscriptionInput, schemas};

pub async fn subscribe(session: &mut Session, values: &FormValues) -> ActionResult<Subscription> {
    let input: SubscriptionInput = try_action!(parse(&schemas::SUBSCRIPTION, values));
    let call = try_action!(with_body(ApiCall::post("subscription"), &input));
    submit_form(session, &call, &[CacheTag::Subscriptions, CacheTag::Stats], values).await
}

/// Returns the caller's subscription; `None` when they have none.
pub async fn my_subscription(session: &mut Session) -> ActionResult<Option<Subscription>> {
    let call = ApiCall::get("subscription/me").cached(&[CacheTag::Subscriptions]);
    match session.send(&call).await {
        Ok(success) => ActionResult::from(success),
        Err(FetchError::Remote {
            status: StatusCode::NOT_FOUND,
            ..
        }) => ActionResult::Success {
            data: Some(None),
            message: None,
            meta: None,
        },
        Err(err) => ActionFailure::from(err).into(),
    }
}

pub async fn cancel_subscription(session: &mut Session) -> ActionResult<Subscription> {
    let call = ApiCall::post("subscription/cancel");
    submit(session, &call, &[CacheTag::Subscriptions, CacheTag::Stats]).await
}
