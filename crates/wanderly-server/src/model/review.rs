use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tourist's rating and comment on a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tour: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub user: Value,
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
