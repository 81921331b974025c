//! Sign-in, sign-up and password management.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wanderly_reqwest::NoCredentials;

use super::{
    ActionFailure, ActionResult, TRACING_TARGET, parse, submit, submit_form, try_action, with_body,
};
use crate::extract::Session;
use crate::model::User;
use crate::service::{ApiCall, ApiSuccess, CacheTag, FetchError};
use crate::validation::{
    ChangePasswordInput, FieldErrors, ForgotPasswordInput, FormValues, LoginInput, RegisterInput,
    ResetPasswordInput, schemas,
};

/// Data returned by login, register and logout.
///
/// `user` is serialized even when absent so clients can rely on the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: Option<User>,
}

impl AuthPayload {
    /// Picks the user out of `data`, either nested under `user` or as the
    /// whole object.
    fn from_data(data: &Value) -> Self {
        let candidate = data.get("user").unwrap_or(data);
        Self {
            user: serde_json::from_value(candidate.clone()).ok(),
        }
    }
}

/// Sends credentials without the caller's cookies and keeps the tokens the
/// API issues.
async fn authenticate(session: &mut Session, call: &ApiCall) -> ActionResult<AuthPayload> {
    let success: ApiSuccess<Value> = match session.gateway().fetch(call, &NoCredentials).await {
        Ok(success) => success,
        // A 401 rejects the submitted credentials, not a session.
        Err(FetchError::Unauthorized { message }) => {
            let rejected = FetchError::Remote {
                status: StatusCode::UNAUTHORIZED,
                message,
                errors: FieldErrors::new(),
            };
            return ActionFailure::from(rejected).into();
        }
        Err(err) => return ActionFailure::from(err).into(),
    };
    session.persist(&success.issued);

    ActionResult::Success {
        data: Some(AuthPayload::from_data(&success.data)),
        message: success.message,
        meta: None,
    }
}

/// Signs in with email and password.
pub async fn login(session: &mut Session, values: &FormValues) -> ActionResult<AuthPayload> {
    let input: LoginInput = try_action!(parse(&schemas::LOGIN, values));
    let call = try_action!(with_body(ApiCall::post("auth/login"), &input));

    let result = authenticate(session, &call).await;
    if let ActionResult::Failure(failure) = result {
        return ActionResult::Failure(failure.with_values(values));
    }

    tracing::info!(target: TRACING_TARGET, "User signed in");
    result
}

/// Creates an account and signs it in when the API issues tokens.
pub async fn register(session: &mut Session, values: &FormValues) -> ActionResult<AuthPayload> {
    let input: RegisterInput = try_action!(parse(&schemas::REGISTER, values));
    let call = try_action!(with_body(ApiCall::post("user/register"), &input));

    match authenticate(session, &call).await {
        ActionResult::Failure(failure) => ActionResult::Failure(failure.with_values(values)),
        success => success,
    }
}

/// Clears the session cookies and tells the API, if it can be reached.
///
/// Succeeds without a session and when the API is down.
pub async fn logout(session: &mut Session) -> ActionResult<AuthPayload> {
    if session.is_authenticated() {
        let call = ApiCall::post("auth/logout");
        if let Err(err) = session.fetch::<Value>(&call).await {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Remote logout failed, clearing local session anyway"
            );
        }
    }

    session.sign_out();

    ActionResult::Success {
        data: Some(AuthPayload::default()),
        message: Some("Logged out successfully".to_owned()),
        meta: None,
    }
}

/// Requests a password reset email.
pub async fn forgot_password(session: &mut Session, values: &FormValues) -> ActionResult<Value> {
    let input: ForgotPasswordInput = try_action!(parse(&schemas::FORGOT_PASSWORD, values));
    let call = try_action!(with_body(ApiCall::post("auth/forgot-password"), &input));

    match session.gateway().fetch(&call, &NoCredentials).await {
        Ok(success) => ActionResult::from(success),
        Err(err) => ActionResult::Failure(ActionFailure::from(err).with_values(values)),
    }
}

/// Sets a new password from a reset link.
pub async fn reset_password(session: &mut Session, values: &FormValues) -> ActionResult<Value> {
    let input: ResetPasswordInput = try_action!(parse(&schemas::RESET_PASSWORD, values));
    let call = try_action!(with_body(ApiCall::post("auth/reset-password"), &input));

    match session.gateway().fetch(&call, &NoCredentials).await {
        Ok(success) => ActionResult::from(success),
        Err(err) => ActionResult::Failure(ActionFailure::from(err).with_values(values)),
    }
}

/// Changes the signed-in user's password.
pub async fn change_password(session: &mut Session, values: &FormValues) -> ActionResult<Value> {
    let input: ChangePasswordInput = try_action!(parse(&schemas::CHANGE_PASSWORD, values));
    let call = try_action!(with_body(ApiCall::post("auth/change-password"), &input));

    submit_form(session, &call, &[], values).await
}

/// Returns the signed-in user's profile.
pub async fn current_user(session: &mut Session) -> ActionResult<User> {
    if !session.is_authenticated() {
        return ActionFailure::authentication("You are not logged in").into();
    }

    let call = ApiCall::get("user/me").cached(&[CacheTag::Users]);
    submit(session, &call, &[]).await
}
