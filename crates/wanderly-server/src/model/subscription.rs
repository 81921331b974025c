use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Billing period of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    /// Every plan name accepted by the API.
    pub const ALL: [&'static str; 2] = ["MONTHLY", "YEARLY"];
}

/// A user's subscription.
///
/// Fields the API adds on top (payment links, invoice ids) are kept in
/// `extra` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keeps_unknown_fields() {
        let subscription: Subscription = serde_json::from_value(json!({
            "_id": "s1",
            "plan": "YEARLY",
            "status": "ACTIVE",
            "paymentUrl": "https://pay.example.com/s1"
        }))
        .unwrap();

        assert_eq!(subscription.plan, SubscriptionPlan::Yearly);
        assert_eq!(subscription.extra["paymentUrl"], json!("https://pay.example.com/s1"));

        let value = serde_json::to_value(&subscription).unwrap();
        assert_eq!(value["paymentUrl"], json!("https://pay.example.com/s1"));
    }
}
