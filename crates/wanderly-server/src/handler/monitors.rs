//! Health check handler.
//!
//! Reports whether the server is up and the external API answers. The API
//! probe is cached by [`HealthCache`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use wanderly_reqwest::ApiClient;

use crate::handler::response::MonitorStatus;
use crate::service::{HealthCache, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "wanderly_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status(
    State(api_client): State<ApiClient>,
    State(health_cache): State<HealthCache>,
) -> (StatusCode, Json<MonitorStatus>) {
    let api_reachable = health_cache.is_healthy(&api_client).await;
    let response = MonitorStatus::new(api_reachable);

    let status_code = if api_reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        api_reachable,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::{create_offline_test_server, create_test_server};
    use crate::mock::MockApi;

    #[tokio::test]
    async fn healthy_when_api_answers() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let server = create_test_server(&api).await?;

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["apiReachable"], json!(true));
        Ok(())
    }

    #[tokio::test]
    async fn degraded_when_api_is_down() -> anyhow::Result<()> {
        let server = create_offline_test_server().await?;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["status"], json!("degraded"));
        Ok(())
    }
}
