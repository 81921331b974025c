//! Authentication handlers: login, registration, logout and password flows.
//!
//! Every handler hands its [`Session`] back so issued or cleared tokens
//! reach the browser as `Set-Cookie` headers.

use axum::Router;
use axum::routing::{get, post};
use serde_json::Value;

use crate::action::ActionResult;
use crate::action::auth::{self, AuthPayload};
use crate::extract::{FormInput, Session};
use crate::model::User;
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn login(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<AuthPayload>) {
    let result = auth::login(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn register(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<AuthPayload>) {
    let result = auth::register(&mut session, &values).await;
    (session, result)
}

/// Works without a session and with the external API down.
#[tracing::instrument(skip_all)]
async fn logout(mut session: Session) -> (Session, ActionResult<AuthPayload>) {
    let result = auth::logout(&mut session).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn forgot_password(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Value>) {
    let result = auth::forgot_password(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn reset_password(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Value>) {
    let result = auth::reset_password(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn change_password(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Value>) {
    let result = auth::change_password(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn current_user(mut session: Session) -> (Session, ActionResult<User>) {
    let result = auth::current_user(&mut session).await;
    (session, result)
}

/// Returns a [`Router`] with the routes open to signed-out visitors.
pub fn public_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/auth/login", post(login))
        .route("/actions/auth/register", post(register))
        .route("/actions/auth/forgot-password", post(forgot_password))
        .route("/actions/auth/reset-password", post(reset_password))
        .route("/logout", post(logout))
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/auth/change-password", post(change_password))
        .route("/actions/me", get(current_user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::SET_COOKIE;
    use serde_json::json;

    use crate::handler::test::{create_offline_test_server, create_test_server};
    use crate::mock::{MockApi, MockResponse};

    #[tokio::test]
    async fn login_sets_cookies() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.push(
            "POST",
            "auth/login",
            MockResponse::json(200, json!({ "success": true, "message": "Logged in", "data": {} }))
                .with_cookie("accessToken=a1; Path=/")
                .with_cookie("refreshToken=r1; Path=/"),
        );
        let server = create_test_server(&api).await?;

        let response = server
            .post("/actions/auth/login")
            .form(&[("email", "ada@example.com"), ("password", "Secret1!")])
            .await;

        response.assert_status_ok();
        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("accessToken=a1")));
        assert!(cookies.iter().any(|c| c.starts_with("refreshToken=r1") && c.contains("HttpOnly")));
        Ok(())
    }

    #[tokio::test]
    async fn login_validation_is_unprocessable() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let server = create_test_server(&api).await?;

        let response = server
            .post("/actions/auth/login")
            .json(&json!({ "email": "nope", "password": "Secret1!" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], json!(false));
        assert!(body["errors"]["email"].is_array());
        assert!(body["values"].get("password").is_none());
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn logout_without_api() -> anyhow::Result<()> {
        let server = create_offline_test_server().await?;

        let response = server
            .post("/logout")
            .add_header("cookie", "accessToken=a1; refreshToken=r1")
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["user"], serde_json::Value::Null);

        let removals: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        assert_eq!(removals.len(), 2);
        assert!(removals.iter().all(|c| c.contains("Max-Age=0")));
        assert!(removals.iter().any(|c| c.starts_with("accessToken=")));
        assert!(removals.iter().any(|c| c.starts_with("refreshToken=")));
        Ok(())
    }

    #[tokio::test]
    async fn logout_notifies_reachable_api() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        api.respond("POST", "auth/logout", 200, json!({ "success": true, "data": null }));
        let server = create_test_server(&api).await?;

        let response = server
            .post("/logout")
            .add_header("cookie", "accessToken=a1; refreshToken=r1")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "message": "Logged out successfully",
            "data": { "user": null }
        }));
        assert_eq!(api.hits("POST", "auth/logout"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn me_requires_session() -> anyhow::Result<()> {
        let api = MockApi::start().await?;
        let server = create_test_server(&api).await?;

        let response = server.get("/actions/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(api.total_hits(), 0);
        Ok(())
    }
}
