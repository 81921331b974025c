use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use derive_more::{Deref, DerefMut, From};
use serde_json::Value;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};
use crate::validation::FormValues;

/// Maximum accepted form body, enforced by the body limit middleware.
pub const MAX_FORM_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Raw form submission, before validation.
///
/// Accepts a JSON object or an `application/x-www-form-urlencoded` body.
/// In a URL-encoded body a repeated key, or a key ending in `[]`, becomes a
/// list. An empty body yields an empty map so schemas report their required
/// fields.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut, From)]
pub struct FormInput(pub FormValues);

impl FormInput {
    #[inline]
    pub fn into_inner(self) -> FormValues {
        self.0
    }
}

impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ErrorKind::PayloadTooLarge.into_error()
            } else {
                ErrorKind::BadRequest
                    .with_message("Failed to read request body")
                    .with_context(sanitize_error_message(&rejection.body_text()))
            }
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match content_type.as_deref() {
            Some(ct) if ct == "application/json" || ct.ends_with("+json") => parse_json(&body),
            Some("application/x-www-form-urlencoded") => Ok(Self(parse_urlencoded(&body))),
            _ => Err(ErrorKind::UnsupportedMediaType
                .with_message("Send a JSON object or a URL-encoded form")),
        }
    }
}

fn parse_json(body: &[u8]) -> Result<FormInput, Error<'static>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(FormInput(map)),
        Ok(_) => Err(ErrorKind::BadRequest.with_message("Request body must be a JSON object")),
        Err(err) => Err(ErrorKind::BadRequest
            .with_message("Invalid JSON syntax in request body")
            .with_context(sanitize_error_message(&err.to_string()))),
    }
}

fn parse_urlencoded(body: &[u8]) -> FormValues {
    let mut values = FormValues::new();

    for (key, value) in url::form_urlencoded::parse(body) {
        let (key, forced_list) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped.to_owned(), true),
            None => (key.into_owned(), false),
        };
        let value = Value::String(value.into_owned());

        match values.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None if forced_list => {
                values.insert(key, Value::Array(vec![value]));
            }
            None => {
                values.insert(key, value);
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use serde_json::json;

    use super::*;

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn json_object() -> anyhow::Result<()> {
        let req = request("application/json", r#"{"tour":"t1","numberOfPeople":2}"#);
        let FormInput(values) = FormInput::from_request(req, &()).await?;

        assert_eq!(values["numberOfPeople"], json!(2));
        Ok(())
    }

    #[tokio::test]
    async fn urlencoded_lists() -> anyhow::Result<()> {
        let req = request(
            "application/x-www-form-urlencoded; charset=utf-8",
            "title=Hill+trek&included=Meals&included=Guide&amenities[]=Wifi",
        );
        let FormInput(values) = FormInput::from_request(req, &()).await?;

        assert_eq!(values["title"], json!("Hill trek"));
        assert_eq!(values["included"], json!(["Meals", "Guide"]));
        assert_eq!(values["amenities"], json!(["Wifi"]));
        Ok(())
    }

    #[tokio::test]
    async fn empty_body_is_empty_form() -> anyhow::Result<()> {
        let req = Request::builder().method("POST").body(Body::empty())?;
        let FormInput(values) = FormInput::from_request(req, &()).await?;
        assert!(values.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_other_bodies() {
        let err = FormInput::from_request(request("text/plain", "hello"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);

        let err = FormInput::from_request(request("application/json", "[1,2]"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = FormInput::from_request(request("application/json", "{oops"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
