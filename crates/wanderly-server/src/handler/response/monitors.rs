//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Health of the server and the external API behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// System monitoring status response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Overall status.
    pub status: ServiceStatus,
    /// Whether the external API answered.
    pub api_reachable: bool,
    /// Application version.
    pub version: String,
}

impl MonitorStatus {
    pub fn new(api_reachable: bool) -> Self {
        Self {
            checked_at: Timestamp::now(),
            status: if api_reachable {
                ServiceStatus::Healthy
            } else {
                ServiceStatus::Degraded
            },
            api_reachable,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
