//! Booking creation and management.

use std::collections::HashMap;

use serde_json::Value;

use super::{
    ActionResult, parse, resource_id, submit, submit_form, try_action, with_body, with_filters,
};
use crate::extract::Session;
use crate::model::Booking;
use crate::service::{ApiCall, CacheTag};
use crate::validation::{BookingInput, BookingStatusInput, FormValues, schemas};

/// Query parameters forwarded to the booking listing.
const BOOKING_FILTERS: &[&str] = &["page", "limit", "status", "sort"];

/// Books a tour for the signed-in tourist.
///
/// The API may answer with the booking or with a payment redirect, so the
/// data is passed through as-is.
pub async fn create_booking(session: &mut Session, values: &FormValues) -> ActionResult<Value> {
    let input: BookingInput = try_action!(parse(&schemas::BOOKING, values));
    let call = try_action!(with_body(ApiCall::post("booking"), &input));

    submit_form(session, &call, &[CacheTag::Bookings, CacheTag::Stats], values).await
}

/// Lists the signed-in tourist's bookings.
pub async fn my_bookings(session: &mut Session) -> ActionResult<Vec<Booking>> {
    let call = ApiCall::get("booking/my-bookings").cached(&[CacheTag::Bookings]);
    submit(session, &call, &[]).await
}

/// Lists every booking; admin only on the API side.
pub async fn all_bookings(
    session: &mut Session,
    query: &HashMap<String, String>,
) -> ActionResult<Vec<Booking>> {
    let call =
        with_filters(ApiCall::get("booking"), query, BOOKING_FILTERS).cached(&[CacheTag::Bookings]);
    submit(session, &call, &[]).await
}

pub async fn update_booking_status(
    session: &mut Session,
    id: &str,
    values: &FormValues,
) -> ActionResult<Booking> {
    let id = try_action!(resource_id(id, "booking").map_err(|failure| failure.with_values(values)));
    let input: BookingStatusInput = try_action!(parse(&schemas::BOOKING_STATUS, values));
    let call = try_action!(with_body(
        ApiCall::patch(format!("booking/{id}/status")),
        &input
    ));

    submit_form(session, &call, &[CacheTag::Bookings, CacheTag::Stats], values).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wanderly_reqwest::{ApiClient, ApiConfig};

    use super::*;
    use crate::action::FailureKind;
    use crate::extract::{CookieSettings, test_session};
    use crate::mock::MockApi;
    use crate::service::{ApiGateway, ResponseCache};

    fn form(value: Value) -> FormValues {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn zero_people_never_reaches_the_api() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let values = form(json!({ "tour": "t1", "numberOfPeople": 0 }));
        let result = create_booking(&mut session, &values).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(
            failure.errors.first("numberOfPeople"),
            Some("At least 1 person is required")
        );
        assert_eq!(failure.values.as_ref().unwrap()["tour"], json!("t1"));
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn creates_booking() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond(
            "POST",
            "booking",
            201,
            json!({
                "success": true,
                "message": "Booking created",
                "data": { "paymentUrl": "https://pay.example.com/b1" }
            }),
        );

        let mut session = test_session(&api, Some("a1"), None);
        let values = form(json!({ "tour": "t1", "numberOfPeople": "2" }));
        let result = create_booking(&mut session, &values).await;

        assert_eq!(result.message(), Some("Booking created"));
        let sent = &api.requests("POST", "booking")[0];
        assert_eq!(sent.body, json!({ "tour": "t1", "numberOfPeople": 2 }));
        assert_eq!(sent.cookie.as_deref(), Some("accessToken=a1"));
        Ok(())
    }

    #[tokio::test]
    async fn creating_invalidates_cached_bookings() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "booking/my-bookings", 200, json!({ "success": true, "data": [] }));
        api.respond("POST", "booking", 201, json!({ "success": true, "data": {} }));

        let client = ApiClient::new(ApiConfig::new(api.base_url()))?;
        let gateway = ApiGateway::new(client, ResponseCache::new(Duration::from_secs(60)));
        let tokens = test_session(&api, Some("a1"), None).tokens().clone();
        let mut session = Session::new(tokens, gateway, CookieSettings::default());

        assert!(my_bookings(&mut session).await.is_success());
        assert!(my_bookings(&mut session).await.is_success());
        assert_eq!(api.hits("GET", "booking/my-bookings"), 1);

        let values = form(json!({ "tour": "t1", "numberOfPeople": 1 }));
        assert!(create_booking(&mut session, &values).await.is_success());

        assert!(my_bookings(&mut session).await.is_success());
        assert_eq!(api.hits("GET", "booking/my-bookings"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_status() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let values = form(json!({ "status": "SHIPPED" }));
        let result = update_booking_status(&mut session, "b1", &values).await;

        assert_eq!(
            result.failure().unwrap().errors.first("status"),
            Some("Invalid booking status")
        );
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn status_update_failures_echo_values() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond(
            "PATCH",
            "booking/b1/status",
            403,
            json!({ "success": false, "message": "Only hosts can change booking status" }),
        );

        let mut session = test_session(&api, Some("a1"), None);
        let values = form(json!({ "status": "CONFIRMED" }));

        let result = update_booking_status(&mut session, "b1", &values).await;
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Remote);
        assert_eq!(failure.values.as_ref(), Some(&values));

        let result = update_booking_status(&mut session, "../b1", &values).await;
        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.values.as_ref(), Some(&values));
        assert_eq!(api.total_hits(), 1);
        Ok(())
    }
}
