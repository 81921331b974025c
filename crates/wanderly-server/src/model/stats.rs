use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform-wide figures shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_tours: u64,
    pub total_bookings: u64,
    pub total_revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Figures for a host's own tours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostStats {
    pub total_tours: u64,
    pub total_bookings: u64,
    pub total_revenue: f64,
    pub average_rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
