//! Page handlers: the tour catalogue, tour detail and dashboards.
//!
//! Pages answer with a view model, a fallback panel (503) or a redirect.

use std::collections::HashMap;

use axum::Router;
use axum::routing::get;

use crate::extract::{Path, Query, Session};
use crate::page::{self, AdminDashboard, Catalogue, HostDashboard, Page, TourDetail, TouristDashboard};
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn catalogue(
    mut session: Session,
    Query(query): Query<HashMap<String, String>>,
) -> (Session, Page<Catalogue>) {
    let page = page::catalogue(&mut session, &query).await;
    (session, page)
}

#[tracing::instrument(skip_all)]
async fn tour_detail(
    mut session: Session,
    Path(slug): Path<String>,
) -> (Session, Page<TourDetail>) {
    let page = page::tour_detail(&mut session, &slug).await;
    (session, page)
}

#[tracing::instrument(skip_all)]
async fn admin_dashboard(mut session: Session) -> (Session, Page<AdminDashboard>) {
    let page = page::admin_dashboard(&mut session).await;
    (session, page)
}

#[tracing::instrument(skip_all)]
async fn host_dashboard(mut session: Session) -> (Session, Page<HostDashboard>) {
    let page = page::host_dashboard(&mut session).await;
    (session, page)
}

#[tracing::instrument(skip_all)]
async fn tourist_dashboard(mut session: Session) -> (Session, Page<TouristDashboard>) {
    let page = page::tourist_dashboard(&mut session).await;
    (session, page)
}

/// Returns a [`Router`] with all page routes.
///
/// Dashboards guard themselves so they can redirect instead of failing.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/tours", get(catalogue))
        .route("/tours/{slug}", get(tour_detail))
        .route("/dashboard/admin", get(admin_dashboard))
        .route("/dashboard/host", get(host_dashboard))
        .route("/dashboard/tourist", get(tourist_dashboard))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;
    use crate::mock::MockApi;

    #[tokio::test]
    async fn dashboard_redirects_signed_out_visitor() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let server = create_test_server(&api).await?;

        let response = server.get("/dashboard/tourist").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/login?redirect=%2Fdashboard%2Ftourist"
        );
        Ok(())
    }

    #[tokio::test]
    async fn catalogue_fallback_panel() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("GET", "tour", 500, json!({ "success": false, "message": "db down" }));
        let server = create_test_server(&api).await?;

        let response = server.get("/tours").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<Value>();
        assert_eq!(body["fallback"], json!(true));
        assert_eq!(body["success"], json!(false));
        Ok(())
    }
}
