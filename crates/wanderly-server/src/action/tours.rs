//! Tours, tour types and divisions.

use std::collections::HashMap;

use serde_json::Value;

use super::{
    ActionFailure, ActionResult, parse, resource_id, submit, submit_form, try_action, with_body,
    with_filters,
};
use crate::extract::Session;
use crate::model::{Division, Tour, TourType};
use crate::service::{ApiCall, CacheTag};
use crate::validation::{
    DivisionInput, FieldErrors, FormValues, TourInput, TourTypeInput, TourUpdate, schemas,
};

/// Query parameters forwarded to the tour listing.
const TOUR_FILTERS: &[&str] = &[
    "page",
    "limit",
    "sort",
    "searchTerm",
    "fields",
    "division",
    "tourType",
    "location",
    "minPrice",
    "maxPrice",
];

/// Lists tours with pagination metadata.
pub async fn list_tours(
    session: &mut Session,
    query: &HashMap<String, String>,
) -> ActionResult<Vec<Tour>> {
    let call = with_filters(ApiCall::get("tour"), query, TOUR_FILTERS).cached(&[CacheTag::Tours]);
    submit(session, &call, &[]).await
}

/// Fetches one tour by id or slug.
pub async fn get_tour(session: &mut Session, id: &str) -> ActionResult<Tour> {
    let id = try_action!(resource_id(id, "tour"));
    let call = ApiCall::get(format!("tour/{id}")).cached(&[CacheTag::Tours]);
    submit(session, &call, &[]).await
}

pub async fn create_tour(session: &mut Session, values: &FormValues) -> ActionResult<Tour> {
    let input: TourInput = try_action!(parse(&schemas::TOUR, values));
    let call = try_action!(with_body(ApiCall::post("tour/create"), &input));

    submit_form(session, &call, &[CacheTag::Tours, CacheTag::Stats], values).await
}

/// Applies the provided fields to a tour.
pub async fn update_tour(session: &mut Session, id: &str, values: &FormValues) -> ActionResult<Tour> {
    let id = try_action!(resource_id(id, "tour").map_err(|failure| failure.with_values(values)));
    let input: TourUpdate = try_action!(parse(&schemas::TOUR_UPDATE, values));
    if input.is_empty() {
        let errors = FieldErrors::new().with("form", "Nothing to update");
        return ActionFailure::validation(errors, values).into();
    }

    let call = try_action!(with_body(ApiCall::patch(format!("tour/{id}")), &input));
    submit_form(session, &call, &[CacheTag::Tours, CacheTag::Stats], values).await
}

pub async fn delete_tour(session: &mut Session, id: &str) -> ActionResult<Value> {
    let id = try_action!(resource_id(id, "tour"));
    let call = ApiCall::delete(format!("tour/{id}"));
    submit(session, &call, &[CacheTag::Tours, CacheTag::Reviews, CacheTag::Stats]).await
}

pub async fn list_tour_types(session: &mut Session) -> ActionResult<Vec<TourType>> {
    let call = ApiCall::get("tour/tour-types").cached(&[CacheTag::TourTypes]);
    submit(session, &call, &[]).await
}

pub async fn create_tour_type(session: &mut Session, values: &FormValues) -> ActionResult<TourType> {
    let input: TourTypeInput = try_action!(parse(&schemas::TOUR_TYPE, values));
    let call = try_action!(with_body(ApiCall::post("tour/create-tour-type"), &input));
    submit_form(session, &call, &[CacheTag::TourTypes], values).await
}

pub async fn list_divisions(session: &mut Session) -> ActionResult<Vec<Division>> {
    let call = ApiCall::get("division").cached(&[CacheTag::Divisions]);
    submit(session, &call, &[]).await
}

pub async fn create_division(session: &mut Session, values: &FormValues) -> ActionResult<Division> {
    let input: DivisionInput = try_action!(parse(&schemas::DIVISION, values));
    let call = try_action!(with_body(ApiCall::post("division/create"), &input));
    submit_form(session, &call, &[CacheTag::Divisions], values).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::action::FailureKind;
    use crate::extract::test_session;
    use crate::mock::MockApi;
    use crate::model::Meta;

    fn form(value: Value) -> FormValues {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn tour() -> Value {
        json!({ "_id": "t1", "title": "Sundarbans Explorer", "slug": "sundarbans-explorer" })
    }

    #[tokio::test]
    async fn list_passes_meta_through() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond(
            "GET",
            "tour",
            200,
            json!({
                "success": true,
                "data": [tour()],
                "meta": { "page": 2, "limit": 10, "total": 11, "totalPage": 2 }
            }),
        );

        let mut session = test_session(&api, None, None);
        let query = HashMap::from([
            ("page".to_owned(), "2".to_owned()),
            ("admin".to_owned(), "true".to_owned()),
            ("searchTerm".to_owned(), " ".to_owned()),
        ]);
        let result = list_tours(&mut session, &query).await;

        let ActionResult::Success { data, meta, .. } = result else {
            panic!("expected success");
        };
        assert_eq!(data.unwrap().len(), 1);
        assert_eq!(
            meta,
            Some(Meta {
                page: 2,
                limit: 10,
                total: 11,
                total_pages: Some(2)
            })
        );
        assert_eq!(api.hits("GET", "tour"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn create_checks_date_order() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let values = form(json!({
            "title": "Sundarbans Explorer",
            "description": "Three days through the mangrove forest.",
            "location": "Khulna",
            "costFrom": "120",
            "startDate": "2026-05-10",
            "endDate": "2026-05-08",
            "maxGuest": 12,
            "tourType": "tt1",
            "division": "d1"
        }));
        let result = create_tour(&mut session, &values).await;

        let failure = result.failure().unwrap();
        assert_eq!(
            failure.errors.first("endDate"),
            Some("End date must be on or after the start date")
        );
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_sends_normalized_body() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("POST", "tour/create", 201, json!({ "success": true, "data": tour() }));

        let mut session = test_session(&api, Some("a1"), None);
        let values = form(json!({
            "title": "Sundarbans Explorer",
            "description": "Three days through the mangrove forest.",
            "location": "Khulna",
            "costFrom": "120.5",
            "startDate": "2026-05-10",
            "endDate": "2026-05-12",
            "maxGuest": "12",
            "tourType": "tt1",
            "division": "d1",
            "included": ["Meals", ""]
        }));
        assert!(create_tour(&mut session, &values).await.is_success());

        let sent = &api.requests("POST", "tour/create")[0].body;
        assert_eq!(sent["costFrom"], json!(120.5));
        assert_eq!(sent["maxGuest"], json!(12));
        assert_eq!(sent["startDate"], json!("2026-05-10"));
        assert_eq!(sent["included"], json!(["Meals"]));
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let result = update_tour(&mut session, "t1", &form(json!({ "title": "  " }))).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert!(failure.errors.contains("form"));
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn remote_field_errors_are_kept() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond(
            "PATCH",
            "tour/t1",
            400,
            json!({
                "success": false,
                "message": "Validation Error",
                "errorSources": [{ "path": "title", "message": "Title already exists" }]
            }),
        );

        let mut session = test_session(&api, Some("a1"), None);
        let result = update_tour(&mut session, "t1", &form(json!({ "title": "Duplicate" }))).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Remote);
        assert_eq!(failure.errors.first("title"), Some("Title already exists"));
        assert_eq!(failure.values.as_ref().unwrap()["title"], json!("Duplicate"));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unsafe_ids() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let result = delete_tour(&mut session, "../user").await;
        assert_eq!(result.failure().unwrap().kind, FailureKind::Validation);
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }
}
