//! Role-scoped dashboards.

use serde::Serialize;

use super::{FALLBACK_MESSAGE, FanIn, Page, Settled, guard};
use crate::extract::{Session, TokenClaims};
use crate::model::{AdminStats, Booking, HostStats, Review, Role, Subscription, Tour};
use crate::service::{ApiCall, CacheTag};

/// How many recent items the dashboards list.
const RECENT_LIMIT: &str = "5";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub viewer: TokenClaims,
    pub stats: AdminStats,
    pub recent_bookings: Vec<Booking>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDashboard {
    pub viewer: TokenClaims,
    pub stats: HostStats,
    pub tours: Vec<Tour>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristDashboard {
    pub viewer: TokenClaims,
    pub bookings: Vec<Booking>,
    pub subscription: Option<Subscription>,
    pub reviews: Vec<Review>,
}

fn recent(endpoint: &str, tag: CacheTag) -> ApiCall {
    ApiCall::get(endpoint)
        .with_query("limit", RECENT_LIMIT)
        .with_query("sort", "-createdAt")
        .cached(&[tag])
}

/// Platform stats and recent bookings, with recent reviews if available.
pub async fn admin_dashboard(session: &mut Session) -> Page<AdminDashboard> {
    let viewer = match guard(session, Role::Admin, Role::Admin.dashboard_path()).await {
        Ok(claims) => claims,
        Err(page) => return page,
    };

    let stats_call = ApiCall::get("stats/admin").cached(&[CacheTag::Stats]);
    let bookings_call = recent("booking", CacheTag::Bookings);
    let reviews_call = recent("review", CacheTag::Reviews);

    for attempt in 0..=1 {
        let (stats, bookings, reviews) = tokio::join!(
            session.fetch::<AdminStats>(&stats_call),
            session.fetch::<Vec<Booking>>(&bookings_call),
            session.fetch::<Vec<Review>>(&reviews_call),
        );

        let mut fan_in = FanIn::new();
        let stats = fan_in.required("stats", stats);
        let recent_bookings = fan_in.required("bookings", bookings);
        let reviews = fan_in.optional("reviews", reviews);

        match fan_in.settle(session, attempt).await {
            Settled::Retry => continue,
            Settled::Halt(halt) => return halt.into(),
            Settled::Ready => {}
        }

        let (Some(stats), Some(recent_bookings)) = (stats, recent_bookings) else {
            break;
        };
        return Page::Ready(AdminDashboard {
            viewer,
            stats,
            recent_bookings,
            reviews,
        });
    }

    Page::unavailable(FALLBACK_MESSAGE)
}

/// The host's stats and tours, with reviews of those tours if available.
pub async fn host_dashboard(session: &mut Session) -> Page<HostDashboard> {
    let viewer = match guard(session, Role::Host, Role::Host.dashboard_path()).await {
        Ok(claims) => claims,
        Err(page) => return page,
    };

    let stats_call = ApiCall::get("stats/host").cached(&[CacheTag::Stats]);
    let tours_call = ApiCall::get("tour/my-tours").cached(&[CacheTag::Tours]);
    let reviews_call = ApiCall::get("review/my-reviews").cached(&[CacheTag::Reviews]);

    for attempt in 0..=1 {
        let (stats, tours, reviews) = tokio::join!(
            session.fetch::<HostStats>(&stats_call),
            session.fetch::<Vec<Tour>>(&tours_call),
            session.fetch::<Vec<Review>>(&reviews_call),
        );

        let mut fan_in = FanIn::new();
        let stats = fan_in.required("stats", stats);
        let tours = fan_in.required("tours", tours);
        let reviews = fan_in.optional("reviews", reviews);

        match fan_in.settle(session, attempt).await {
            Settled::Retry => continue,
            Settled::Halt(halt) => return halt.into(),
            Settled::Ready => {}
        }

        let (Some(stats), Some(tours)) = (stats, tours) else {
            break;
        };
        return Page::Ready(HostDashboard {
            viewer,
            stats,
            tours,
            reviews,
        });
    }

    Page::unavailable(FALLBACK_MESSAGE)
}

/// The tourist's bookings, with subscription and reviews if available.
pub async fn tourist_dashboard(session: &mut Session) -> Page<TouristDashboard> {
    let viewer = match guard(session, Role::Tourist, Role::Tourist.dashboard_path()).await {
        Ok(claims) => claims,
        Err(page) => return page,
    };

    let bookings_call = ApiCall::get("booking/my-bookings").cached(&[CacheTag::Bookings]);
    let subscription_call = ApiCall::get("subscription/me").cached(&[CacheTag::Subscriptions]);
    let reviews_call = ApiCall::get("review/my-reviews").cached(&[CacheTag::Reviews]);

    for attempt in 0..=1 {
        let (bookings, subscription, reviews) = tokio::join!(
            session.fetch::<Vec<Booking>>(&bookings_call),
            session.fetch::<Option<Subscription>>(&subscription_call),
            session.fetch::<Vec<Review>>(&reviews_call),
        );

        let mut fan_in = FanIn::new();
        let bookings = fan_in.required("bookings", bookings);
        let subscription = fan_in.optional("subscription", subscription);
        let reviews = fan_in.optional("reviews", reviews);

        match fan_in.settle(session, attempt).await {
            Settled::Retry => continue,
            Settled::Halt(halt) => return halt.into(),
            Settled::Ready => {}
        }

        let Some(bookings) = bookings else {
            break;
        };
        return Page::Ready(TouristDashboard {
            viewer,
            bookings,
            subscription,
            reviews,
        });
    }

    Page::unavailable(FALLBACK_MESSAGE)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use wanderly_reqwest::Credential;

    use super::*;
    use crate::extract::{encode_test_token, test_session};
    use crate::mock::{MockApi, MockResponse};

    fn token(role: &str) -> String {
        encode_test_token(&json!({ "userId": "u1", "role": role }))
    }

    fn ok(data: Value) -> Value {
        json!({ "success": true, "data": data })
    }

    fn booking() -> Value {
        json!({ "_id": "b1", "tour": "t1", "numberOfPeople": 2, "status": "CONFIRMED" })
    }

    #[tokio::test]
    async fn admin_required_failure_shows_fallback() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "stats/admin", 500, json!({ "success": false, "message": "boom" }));
        api.respond("GET", "booking", 200, ok(json!([booking()])));
        api.respond("GET", "review", 200, ok(json!([])));

        let mut session = test_session(&api, Some(&token("ADMIN")), None);
        let page = admin_dashboard(&mut session).await;

        assert_eq!(page, Page::unavailable(FALLBACK_MESSAGE));
        assert_eq!(api.hits("GET", "booking"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn host_optional_failure_still_renders() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "stats/host", 200, ok(json!({ "totalTours": 3, "totalBookings": 7 })));
        api.respond("GET", "tour/my-tours", 200, ok(json!([{ "_id": "t1", "title": "Hill tracts" }])));
        api.respond("GET", "review/my-reviews", 502, json!({ "success": false, "message": "down" }));

        let mut session = test_session(&api, Some(&token("HOST")), None);
        let page = host_dashboard(&mut session).await;

        let view = page.ready().unwrap();
        assert_eq!(view.stats.total_tours, 3);
        assert_eq!(view.tours.len(), 1);
        assert!(view.reviews.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn tourist_without_subscription() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "booking/my-bookings", 200, ok(json!([booking()])));
        api.respond("GET", "subscription/me", 200, ok(Value::Null));
        api.respond("GET", "review/my-reviews", 200, ok(json!([])));

        let mut session = test_session(&api, Some(&token("TOURIST")), None);
        let page = tourist_dashboard(&mut session).await;

        let view = page.ready().unwrap();
        assert_eq!(view.bookings.len(), 1);
        assert_eq!(view.subscription, None);
        assert_eq!(view.viewer.role, Role::Tourist);
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_fan_out_retries_after_refresh() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let rejected = json!({ "success": false, "message": "jwt expired" });
        api.respond("GET", "booking/my-bookings", 401, rejected.clone());
        api.respond("GET", "booking/my-bookings", 200, ok(json!([])));
        api.respond("GET", "subscription/me", 401, rejected);
        api.respond("GET", "subscription/me", 200, ok(Value::Null));
        api.respond("GET", "review/my-reviews", 200, ok(json!([])));

        let fresh = token("TOURIST");
        api.push(
            "POST",
            "auth/refresh-token",
            MockResponse::json(200, ok(json!({})))
                .with_cookie(&format!("accessToken={fresh}; Path=/")),
        );

        let mut session = test_session(&api, Some(&token("TOURIST")), Some("r1"));
        let page = tourist_dashboard(&mut session).await;

        assert!(page.is_ready());
        assert_eq!(api.hits("POST", "auth/refresh-token"), 1);
        assert_eq!(api.hits("GET", "booking/my-bookings"), 2);
        assert_eq!(api.hits("GET", "review/my-reviews"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn failed_refresh_redirects_to_login() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "stats/host", 401, json!({ "success": false, "message": "expired" }));
        api.respond("GET", "tour/my-tours", 200, ok(json!([])));
        api.respond("GET", "review/my-reviews", 200, ok(json!([])));
        api.respond("POST", "auth/refresh-token", 403, json!({ "success": false, "message": "revoked" }));

        let mut session = test_session(&api, Some(&token("HOST")), Some("r1"));
        let page = host_dashboard(&mut session).await;

        assert_eq!(page, Page::redirect("/login"));
        assert_eq!(session.tokens().get(Credential::RefreshToken), None);
        Ok(())
    }
}
