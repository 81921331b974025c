//! Subscription handlers.

use axum::Router;
use axum::routing::{get, post};

use crate::action::{ActionResult, subscriptions};
use crate::extract::{FormInput, Session};
use crate::model::Subscription;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn subscribe(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Subscription>) {
    let result = subscriptions::subscribe(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn my_subscription(mut session: Session) -> (Session, ActionResult<Option<Subscription>>) {
    let result = subscriptions::my_subscription(&mut session).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn cancel_subscription(mut session: Session) -> (Session, ActionResult<Subscription>) {
    let result = subscriptions::cancel_subscription(&mut session).await;
    (session, result)
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/subscriptions", post(subscribe))
        .route("/actions/subscriptions/me", get(my_subscription))
        .route("/actions/subscriptions/cancel", post(cancel_subscription))
}
