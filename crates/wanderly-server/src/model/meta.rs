use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(alias = "totalPage", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}
