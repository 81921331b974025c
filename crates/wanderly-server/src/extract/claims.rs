//! Claims carried in the access token.
//!
//! The external API signs and verifies its tokens. The server only reads
//! the payload to decide when to refresh and where to route a user, so the
//! signature is never checked here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::model::Role;

/// Seconds before `exp` at which a token already counts as expired.
const EXPIRY_LEEWAY_SECS: i64 = 10;

/// Decoded payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Account identifier.
    #[serde(alias = "_id", alias = "sub")]
    pub user_id: String,
    /// Account email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account role.
    pub role: Role,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decodes the payload segment of a JWT without verifying it.
    ///
    /// Returns `None` for anything that is not a three-segment token with a
    /// JSON payload carrying at least a user id and a role.
    pub fn decode(token: &str) -> Option<Self> {
        let mut segments = token.split('.');
        let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
        if segments.next().is_some() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Returns `true` once `now` is within the leeway of `exp`.
    ///
    /// Tokens without an `exp` claim never expire on this side.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.exp
            .is_some_and(|exp| now.as_second() + EXPIRY_LEEWAY_SECS >= exp)
    }

    /// Returns `true` if the token is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_payload() {
        let token = encode_test_token(&json!({
            "userId": "u1",
            "email": "host@example.com",
            "role": "HOST",
            "exp": 4_102_444_800i64
        }));

        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.role, Role::Host);
        assert!(!claims.is_expired());
    }

    #[test]
    fn expired_within_leeway() {
        let claims = TokenClaims {
            user_id: "u1".into(),
            email: None,
            role: Role::Tourist,
            exp: Some(1_000),
        };

        assert!(claims.is_expired_at(Timestamp::from_second(995).unwrap()));
        assert!(!claims.is_expired_at(Timestamp::from_second(900).unwrap()));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(TokenClaims::decode("not-a-token").is_none());
        assert!(TokenClaims::decode("a.b").is_none());
        assert!(TokenClaims::decode("a.!!!.c").is_none());
        assert!(TokenClaims::decode("a.b.c.d").is_none());
    }
}
