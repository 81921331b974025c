//! Booking handlers.

use std::collections::HashMap;

use axum::Router;
use axum::routing::{get, patch};
use serde_json::Value;

use crate::action::{ActionResult, bookings};
use crate::extract::{FormInput, Path, Query, Session};
use crate::model::Booking;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn create_booking(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Value>) {
    let result = bookings::create_booking(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn all_bookings(
    mut session: Session,
    Query(query): Query<HashMap<String, String>>,
) -> (Session, ActionResult<Vec<Booking>>) {
    let result = bookings::all_bookings(&mut session, &query).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn my_bookings(mut session: Session) -> (Session, ActionResult<Vec<Booking>>) {
    let result = bookings::my_bookings(&mut session).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn update_booking_status(
    mut session: Session,
    Path(booking_id): Path<String>,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Booking>) {
    let result = bookings::update_booking_status(&mut session, &booking_id, &values).await;
    (session, result)
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/bookings", get(all_bookings).post(create_booking))
        .route("/actions/bookings/mine", get(my_bookings))
        .route("/actions/bookings/{booking_id}/status", patch(update_booking_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;
    use crate::mock::MockApi;

    #[tokio::test]
    async fn invalid_booking_is_rejected_locally() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let server = create_test_server(&api).await?;

        let response = server
            .post("/actions/bookings")
            .add_header("cookie", "accessToken=a1")
            .form(&[("tour", "t1"), ("numberOfPeople", "0")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(
            body["errors"]["numberOfPeople"],
            json!(["At least 1 person is required"])
        );
        assert_eq!(body["values"]["tour"], json!("t1"));
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_api_is_bad_gateway() -> anyhow::Result<()> {
        let server = crate::handler::test::create_offline_test_server().await?;

        let response = server
            .get("/actions/bookings/mine")
            .add_header("cookie", "accessToken=a1")
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body = response.json::<Value>();
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
        Ok(())
    }
}
