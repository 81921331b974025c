//! Profile handlers.

use axum::Router;
use axum::routing::patch;

use crate::action::{ActionResult, users};
use crate::extract::{FormInput, Session};
use crate::model::User;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn update_profile(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<User>) {
    let result = users::update_profile(&mut session, &values).await;
    (session, result)
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new().route("/actions/profile", patch(update_profile))
}
