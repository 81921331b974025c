//! Review handlers.

use axum::Router;
use axum::routing::post;

use crate::action::{ActionResult, reviews};
use crate::extract::{FormInput, Session};
use crate::model::Review;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn create_review(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Review>) {
    let result = reviews::create_review(&mut session, &values).await;
    (session, result)
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new().route("/actions/reviews", post(create_review))
}
