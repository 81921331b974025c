//! Profile updates.

use super::{ActionFailure, ActionResult, parse, submit_form, try_action, with_body};
use crate::extract::Session;
use crate::model::User;
use crate::service::{ApiCall, CacheTag};
use crate::validation::{FieldErrors, FormValues, ProfileInput, schemas};

/// Updates the signed-in user's profile with the fields provided.
pub async fn update_profile(session: &mut Session, values: &FormValues) -> ActionResult<User> {
    let input: ProfileInput = try_action!(parse(&schemas::PROFILE, values));
    if input.name.is_none()
        && input.phone.is_none()
        && input.address.is_none()
        && input.picture.is_none()
    {
        let errors = FieldErrors::new().with("form", "Nothing to update");
        return ActionFailure::validation(errors, values).into();
    }

    let call = try_action!(with_body(ApiCall::patch("user/me"), &input));
    submit_form(session, &call, &[CacheTag::Users], values).await
}
