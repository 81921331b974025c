use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Account role as issued by the external API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(alias = "SUPER_ADMIN")]
    #[strum(to_string = "ADMIN", serialize = "SUPER_ADMIN")]
    Admin,
    Host,
    #[serde(alias = "USER")]
    #[strum(to_string = "TOURIST", serialize = "USER")]
    Tourist,
}

impl Role {
    /// Returns the dashboard route for this role.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/dashboard/admin",
            Self::Host => "/dashboard/host",
            Self::Tourist => "/dashboard/tourist",
        }
    }
}

/// Public profile of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}
