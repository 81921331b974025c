//! Schemas for every form the server accepts, and the typed inputs they
//! produce.

use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{BookingStatus, SubscriptionPlan};
use crate::validation::{Field, RefinementCheck, Schema};

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid uppercase pattern"));
static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit pattern"));
static SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]").expect("valid special character pattern"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone pattern"));

const REGISTER_ROLES: &[&str] = &["TOURIST", "HOST"];

fn email() -> Field {
    Field::text("email")
        .required("Email is required")
        .email("Please enter a valid email address")
}

fn strong_password(name: &'static str, required: &'static str) -> Field {
    Field::text(name)
        .required(required)
        .min_len(8, "Password must be at least 8 characters")
        .pattern(&UPPERCASE, "Password must contain at least 1 uppercase letter")
        .pattern(&DIGIT, "Password must contain at least 1 number")
        .pattern(&SPECIAL, "Password must contain at least 1 special character")
}

fn phone() -> Field {
    Field::text("phone").pattern(
        &PHONE,
        "Phone number must be 10 to 15 digits, optionally starting with +",
    )
}

fn address() -> Field {
    Field::text("address").max_len(200, "Address cannot exceed 200 characters")
}

pub static LOGIN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("login").field(email()).field(
        Field::text("password")
            .required("Password is required")
            .min_len(6, "Password must be at least 6 characters"),
    )
});

pub static REGISTER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("register")
        .field(
            Field::text("name")
                .required("Name is required")
                .min_len(2, "Name must be at least 2 characters")
                .max_len(50, "Name cannot exceed 50 characters"),
        )
        .field(email())
        .field(strong_password("password", "Password is required"))
        .field(Field::text("confirmPassword").required("Please confirm your password"))
        .field(phone())
        .field(address())
        .field(Field::text("role").one_of(REGISTER_ROLES, "Role must be either TOURIST or HOST"))
        .refine(
            "confirmPassword",
            RefinementCheck::Matches { other: "password" },
            "Passwords do not match",
        )
});

pub static FORGOT_PASSWORD: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("forgot_password").field(email()));

pub static RESET_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("reset_password")
        .field(Field::text("id"))
        .field(Field::text("token").required("Reset token is required"))
        .field(strong_password("newPassword", "New password is required"))
        .field(Field::text("confirmPassword").required("Please confirm your password"))
        .refine(
            "confirmPassword",
            RefinementCheck::Matches {
                other: "newPassword",
            },
            "Passwords do not match",
        )
});

pub static CHANGE_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("change_password")
        .field(Field::text("oldPassword").required("Current password is required"))
        .field(strong_password("newPassword", "New password is required"))
        .field(Field::text("confirmPassword").required("Please confirm your password"))
        .refine(
            "newPassword",
            RefinementCheck::Differs {
                other: "oldPassword",
            },
            "New password must be different from the current password",
        )
        .refine(
            "confirmPassword",
            RefinementCheck::Matches {
                other: "newPassword",
            },
            "Passwords do not match",
        )
});

pub static PROFILE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("profile")
        .field(
            Field::text("name")
                .min_len(2, "Name must be at least 2 characters")
                .max_len(50, "Name cannot exceed 50 characters"),
        )
        .field(phone())
        .field(address())
        .field(Field::text("picture").url("Picture must be a valid URL"))
});

pub static TOUR: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("tour")
        .field(
            Field::text("title")
                .required("Title is required")
                .min_len(3, "Title must be at least 3 characters")
                .max_len(100, "Title cannot exceed 100 characters"),
        )
        .field(
            Field::text("description")
                .required("Description is required")
                .min_len(20, "Description must be at least 20 characters"),
        )
        .field(Field::text("location").required("Location is required"))
        .field(
            Field::number("costFrom")
                .required("Price is required")
                .invalid("Price must be a number")
                .min(0.0, "Price cannot be negative"),
        )
        .field(Field::date("startDate").required("Start date is required"))
        .field(Field::date("endDate").required("End date is required"))
        .field(
            Field::integer("maxGuest")
                .required("Maximum guests is required")
                .min(1.0, "At least 1 guest is required")
                .max(100.0, "Maximum 100 guests allowed"),
        )
        .field(
            Field::integer("minAge")
                .min(0.0, "Minimum age cannot be negative")
                .max(100.0, "Minimum age cannot exceed 100"),
        )
        .field(Field::text("tourType").required("Tour type is required"))
        .field(Field::text("division").required("Division is required"))
        .field(Field::list("included"))
        .field(Field::list("excluded"))
        .field(Field::list("amenities"))
        .field(Field::list("tourPlan"))
        .refine(
            "endDate",
            RefinementCheck::NotBefore { other: "startDate" },
            "End date must be on or after the start date",
        )
});

pub static TOUR_UPDATE: LazyLock<Schema> = LazyLock::new(|| TOUR.partial("tour_update"));

pub static BOOKING: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("booking")
        .field(Field::text("tour").required("Tour is required"))
        .field(
            Field::integer("numberOfPeople")
                .required("Number of people is required")
                .min(1.0, "At least 1 person is required")
                .max(100.0, "Maximum 100 people allowed"),
        )
        .field(
            Field::text("specialRequests")
                .max_len(500, "Special requests cannot exceed 500 characters"),
        )
});

pub static BOOKING_STATUS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("booking_status").field(
        Field::text("status")
            .required("Status is required")
            .one_of(&BookingStatus::ALL, "Invalid booking status"),
    )
});

pub static REVIEW: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("review")
        .field(Field::text("tour").required("Tour is required"))
        .field(
            Field::integer("rating")
                .required("Rating is required")
                .min(1.0, "Rating must be at least 1")
                .max(5.0, "Rating must be at most 5"),
        )
        .field(
            Field::text("comment")
                .required("Comment is required")
                .min_len(10, "Comment must be at least 10 characters")
                .max_len(1000, "Comment cannot exceed 1000 characters"),
        )
});

pub static SUBSCRIPTION: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("subscription").field(
        Field::text("plan")
            .required("Plan is required")
            .one_of(&SubscriptionPlan::ALL, "Plan must be either MONTHLY or YEARLY"),
    )
});

pub static TOUR_TYPE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("tour_type").field(
        Field::text("name")
            .required("Name is required")
            .min_len(2, "Name must be at least 2 characters")
            .max_len(50, "Name cannot exceed 50 characters"),
    )
});

pub static DIVISION: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("division")
        .field(
            Field::text("name")
                .required("Name is required")
                .min_len(2, "Name must be at least 2 characters")
                .max_len(50, "Name cannot exceed 50 characters"),
        )
        .field(Field::text("description").max_len(500, "Description cannot exceed 500 characters"))
        .field(Field::text("thumbnail").url("Thumbnail must be a valid URL"))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Only checked locally.
    #[serde(skip_serializing)]
    pub confirm_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgotPasswordInput {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub token: String,
    pub new_password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub cost_from: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub max_guest: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    pub tour_type: String,
    pub division: String,
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub tour_plan: Vec<String>,
}

/// Partial tour update. Only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_plan: Option<Vec<String>>,
}

impl TourUpdate {
    /// Returns `true` when no field was supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub tour: String,
    pub number_of_people: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStatusInput {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub tour: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub plan: SubscriptionPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourTypeInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::validation::{FormValues, ValidationResult, normalize, validate};

    fn values(value: Value) -> FormValues {
        match value {
            Value::Object(map) => map,
            _ => FormValues::new(),
        }
    }

    #[test]
    fn booking_people_bounds() {
        let errors = normalize(&BOOKING, &values(json!({ "tour": "t1", "numberOfPeople": 0 })))
            .unwrap_err();
        assert_eq!(
            errors.first("numberOfPeople"),
            Some("At least 1 person is required")
        );
        assert_eq!(errors.len(), 1);

        let errors = normalize(
            &BOOKING,
            &values(json!({ "tour": "t1", "numberOfPeople": "150" })),
        )
        .unwrap_err();
        assert_eq!(
            errors.first("numberOfPeople"),
            Some("Maximum 100 people allowed")
        );
    }

    #[test]
    fn booking_valid() {
        let result = validate::<BookingInput>(
            &BOOKING,
            &values(json!({ "tour": "t1", "numberOfPeople": "4", "specialRequests": "" })),
        );

        assert_eq!(
            result,
            ValidationResult::Valid(BookingInput {
                tour: "t1".into(),
                number_of_people: 4,
                special_requests: None,
            })
        );
    }

    #[test]
    fn review_comment_length() {
        let input = values(json!({ "tour": "t1", "rating": 5, "comment": "Too short" }));
        let errors = normalize(&REVIEW, &input).unwrap_err();

        assert_eq!(
            errors.first("comment"),
            Some("Comment must be at least 10 characters")
        );
        assert!(!errors.contains("rating"));

        let input = values(json!({ "tour": "t1", "rating": 5, "comment": "Great views" }));
        assert!(validate::<ReviewInput>(&REVIEW, &input).is_valid());
    }

    #[test]
    fn register_password_rules_and_match() {
        let input = values(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "weakpass",
            "confirmPassword": "weakpass"
        }));
        let errors = normalize(&REGISTER, &input).unwrap_err();
        assert_eq!(
            errors.get("password").unwrap(),
            [
                "Password must contain at least 1 uppercase letter",
                "Password must contain at least 1 number",
                "Password must contain at least 1 special character",
            ]
        );

        let input = values(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "Str0ng!pass",
            "confirmPassword": "Str0ng!pasz"
        }));
        let errors = normalize(&REGISTER, &input).unwrap_err();
        assert_eq!(errors.first("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn register_does_not_send_confirmation() {
        let input = values(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "Str0ng!pass",
            "confirmPassword": "Str0ng!pass",
            "role": "HOST"
        }));
        let input = validate::<RegisterInput>(&REGISTER, &input)
            .into_result()
            .unwrap();

        let body = serde_json::to_value(&input).unwrap();
        assert!(body.get("confirmPassword").is_none());
        assert_eq!(body["role"], json!("HOST"));
    }

    #[test]
    fn login_email_messages() {
        let errors = normalize(&LOGIN, &values(json!({ "email": "", "password": "x" })))
            .unwrap_err();
        assert_eq!(errors.first("email"), Some("Email is required"));
        assert_eq!(
            errors.first("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn change_password_must_differ() {
        let input = values(json!({
            "oldPassword": "Str0ng!pass",
            "newPassword": "Str0ng!pass",
            "confirmPassword": "Str0ng!pass"
        }));
        let errors = normalize(&CHANGE_PASSWORD, &input).unwrap_err();
        assert_eq!(
            errors.first("newPassword"),
            Some("New password must be different from the current password")
        );
    }

    #[test]
    fn tour_dates_and_lists() {
        let input = values(json!({
            "title": "Sundarbans cruise",
            "description": "Three days on the river with local guides.",
            "location": "Khulna",
            "costFrom": "12000",
            "startDate": "2025-05-10",
            "endDate": "2025-05-08",
            "maxGuest": 12,
            "tourType": "tt1",
            "division": "d1",
            "included": ["Meals", "  "]
        }));
        let errors = normalize(&TOUR, &input).unwrap_err();
        assert_eq!(
            errors.first("endDate"),
            Some("End date must be on or after the start date")
        );

        let mut fixed = input.clone();
        fixed.insert("endDate".into(), json!("2025-05-12"));
        let tour = validate::<TourInput>(&TOUR, &fixed).into_result().unwrap();
        assert_eq!(tour.included, ["Meals"]);
        assert_eq!(tour.cost_from, 12000.0);
        assert_eq!(tour.end_date, jiff::civil::date(2025, 5, 12));
    }

    #[test]
    fn tour_update_checks_only_supplied_fields() {
        let update = validate::<TourUpdate>(&TOUR_UPDATE, &values(json!({ "costFrom": 50 })))
            .into_result()
            .unwrap();
        assert_eq!(update.cost_from, Some(50.0));
        assert_eq!(update.title, None);

        let errors = normalize(&TOUR_UPDATE, &values(json!({ "costFrom": -1 }))).unwrap_err();
        assert_eq!(errors.first("costFrom"), Some("Price cannot be negative"));

        assert!(
            validate::<TourUpdate>(&TOUR_UPDATE, &FormValues::new())
                .into_result()
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn enumerated_values() {
        let errors = normalize(&BOOKING_STATUS, &values(json!({ "status": "DONE" }))).unwrap_err();
        assert_eq!(errors.first("status"), Some("Invalid booking status"));

        let input = validate::<SubscriptionInput>(&SUBSCRIPTION, &values(json!({ "plan": "YEARLY" })))
            .into_result()
            .unwrap();
        assert_eq!(input.plan, SubscriptionPlan::Yearly);
    }

    #[test]
    fn division_thumbnail_url() {
        let errors = normalize(
            &DIVISION,
            &values(json!({ "name": "Sylhet", "thumbnail": "not a url" })),
        )
        .unwrap_err();
        assert_eq!(errors.first("thumbnail"), Some("Thumbnail must be a valid URL"));
    }
}
