//! Tour reviews.

use super::{ActionResult, parse, resource_id, submit, submit_form, try_action, with_body};
use crate::extract::Session;
use crate::model::Review;
use crate::service::{ApiCall, CacheTag};
use crate::validation::{FormValues, ReviewInput, schemas};

/// Posts a review for a tour the caller has booked.
pub async fn create_review(session: &mut Session, values: &FormValues) -> ActionResult<Review> {
    let input: ReviewInput = try_action!(parse(&schemas::REVIEW, values));
    let call = try_action!(with_body(ApiCall::post("review"), &input));

    let tags = [CacheTag::Reviews, CacheTag::Tours, CacheTag::Stats];
    submit_form(session, &call, &tags, values).await
}

/// Lists the reviews of one tour.
pub async fn tour_reviews(session: &mut Session, tour: &str) -> ActionResult<Vec<Review>> {
    let tour = try_action!(resource_id(tour, "tour"));
    let call = ApiCall::get(format!("review/tour/{tour}")).cached(&[CacheTag::Reviews]);
    submit(session, &call, &[]).await
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::action::FailureKind;
    use crate::extract::test_session;
    use crate::mock::MockApi;

    fn form(value: Value) -> FormValues {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn short_comment_is_rejected() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let mut session = test_session(&api, Some("a1"), None);

        let values = form(json!({ "tour": "t1", "rating": 5, "comment": "Great" }));
        let result = create_review(&mut session, &values).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(
            failure.errors.first("comment"),
            Some("Comment must be at least 10 characters")
        );
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn lists_reviews_of_a_tour() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond(
            "GET",
            "review/tour/t1",
            200,
            json!({
                "success": true,
                "data": [{ "_id": "r1", "rating": 4, "comment": "Lovely boat ride" }]
            }),
        );

        let mut session = test_session(&api, None, None);
        let result = tour_reviews(&mut session, "t1").await;

        assert_eq!(result.data().map(Vec::len), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_redirects_to_login() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("POST", "review", 401, json!({ "success": false, "message": "jwt expired" }));
        api.respond("POST", "auth/refresh-token", 401, json!({ "success": false, "message": "invalid" }));

        let mut session = test_session(&api, Some("stale"), Some("revoked"));
        let values = form(json!({ "tour": "t1", "rating": 5, "comment": "Wonderful guides" }));
        let result = create_review(&mut session, &values).await;

        let body = serde_json::to_value(&result)?;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["redirectTo"], json!("/login"));
        assert_eq!(body["values"]["comment"], json!("Wonderful guides"));
        assert!(!session.tokens().has_any());
        Ok(())
    }
}
