use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Failed,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [&'static str; 5] = ["PENDING", "CONFIRMED", "CANCELLED", "COMPLETED", "FAILED"];
}

/// A tourist's reservation on a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tour: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub user: Value,
    #[serde(alias = "guestCount")]
    pub number_of_people: u32,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn booking_status_names() {
        assert_eq!(BookingStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!("CANCELLED".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!(BookingStatus::ALL.contains(&BookingStatus::Failed.to_string().as_str()));
    }

    #[test]
    fn booking_accepts_guest_count_alias() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "tour": "t1",
            "guestCount": 3,
            "status": "PENDING"
        }))
        .unwrap();

        assert_eq!(booking.number_of_people, 3);
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
