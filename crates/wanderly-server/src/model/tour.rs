use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bookable tour.
///
/// `tour_type` and `division` are either an id or the populated document,
/// depending on the endpoint, and are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub tour_plan: Vec<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tour_type: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub division: Value,
}

/// Category a tour belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourType {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
}

/// Geographic division tours are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tour_accepts_populated_relations() {
        let tour: Tour = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Sundarbans Explorer",
            "slug": "sundarbans-explorer",
            "costFrom": 120.5,
            "tourType": { "_id": "tt1", "name": "Adventure" },
            "division": "d1"
        }))
        .unwrap();

        assert_eq!(tour.cost_from, Some(120.5));
        assert_eq!(tour.tour_type["name"], json!("Adventure"));
        assert_eq!(tour.division, json!("d1"));
        assert!(tour.images.is_empty());
    }
}
