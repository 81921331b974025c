//! Session credentials and the trait used to look them up.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two named tokens that make up a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Credential {
    /// Short-lived token authorizing regular API calls.
    AccessToken,
    /// Long-lived token used only to obtain a new access token.
    RefreshToken,
}

impl Credential {
    /// Both credentials, access token first.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Returns the cookie name the credential travels under.
    #[must_use]
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }

    /// Looks a credential up by its cookie name.
    #[must_use]
    pub fn from_cookie_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.cookie_name() == name)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cookie_name())
    }
}

/// Anything that can hand out the current value of a credential.
///
/// The server implements this for its per-request cookie store; the client
/// only ever reads through it.
pub trait CredentialSource: Send + Sync {
    /// Returns the stored value, or `None` when the caller is unauthenticated.
    fn credential(&self, credential: Credential) -> Option<&str>;
}

impl<S: CredentialSource + ?Sized> CredentialSource for &S {
    fn credential(&self, credential: Credential) -> Option<&str> {
        (**self).credential(credential)
    }
}

impl CredentialSource for HashMap<Credential, String> {
    fn credential(&self, credential: Credential) -> Option<&str> {
        self.get(&credential).map(String::as_str)
    }
}

/// A source that never has credentials, for public endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialSource for NoCredentials {
    fn credential(&self, _credential: Credential) -> Option<&str> {
        None
    }
}
