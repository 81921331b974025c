//! Schema-driven validation of form submissions.
//!
//! A [`Schema`] lists fields with ordered rules plus cross-field
//! refinements. [`validate`] coerces the raw input, runs every rule, groups
//! messages per field and, when nothing failed, deserializes the cleaned
//! values into a typed input.
//!
//! ```rust,ignore
//! use wanderly_server::validation::{schemas, validate, BookingInput, ValidationResult};
//!
//! match validate::<BookingInput>(&schemas::BOOKING, &values) {
//!     ValidationResult::Valid(input) => submit(input).await,
//!     ValidationResult::Invalid(errors) => render(errors.first("numberOfPeople")),
//! }
//! ```

mod errors;
mod schema;
pub mod schemas;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

pub use crate::validation::errors::{FieldError, FieldErrors};
pub use crate::validation::schema::{
    Check, Field, FieldKind, Refinement, RefinementCheck, Rule, Schema,
};
pub use crate::validation::schemas::*;

/// Tracing target for validation.
pub const TRACING_TARGET: &str = "wanderly_server::validation";

/// Raw submitted values keyed by field name.
pub type FormValues = Map<String, Value>;

/// Outcome of [`validate`]: exactly one of typed input or field errors.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> ValidationResult<T> {
    /// Returns `true` for [`ValidationResult::Valid`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the errors of an invalid result.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// Converts into a standard [`Result`].
    pub fn into_result(self) -> Result<T, FieldErrors> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// Validates `input` against `schema` and deserializes the result into `T`.
pub fn validate<T: DeserializeOwned>(schema: &Schema, input: &FormValues) -> ValidationResult<T> {
    let cleaned = match normalize(schema, input) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            tracing::debug!(
                target: TRACING_TARGET,
                schema = schema.name(),
                fields = ?errors.fields().collect::<Vec<_>>(),
                "Validation failed"
            );
            return ValidationResult::Invalid(errors);
        }
    };

    match serde_json::from_value(Value::Object(cleaned)) {
        Ok(value) => ValidationResult::Valid(value),
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET,
                schema = schema.name(),
                error = %err,
                "Validated input does not fit its typed form"
            );
            ValidationResult::Invalid(FieldErrors::new().with("form", "Invalid submission"))
        }
    }
}

/// Coerces and checks `input`, returning only the schema's fields.
///
/// Absent optional fields are left out of the output. Refinements run only
/// when every field passed.
pub fn normalize(schema: &Schema, input: &FormValues) -> Result<FormValues, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut cleaned = FormValues::new();

    for field in schema.fields() {
        let raw = input.get(field.name).unwrap_or(&Value::Null);

        let value = match coerce(field.kind, raw) {
            Coerced::Absent => {
                if let Some(message) = field.required {
                    errors.push(field.name, message);
                }
                continue;
            }
            Coerced::Invalid => {
                errors.push(field.name, field.invalid);
                continue;
            }
            Coerced::Present(value) => value,
        };

        for rule in &field.rules {
            if !rule.check.passes(&value) {
                errors.push(field.name, rule.message);
            }
        }

        cleaned.insert(field.name.to_string(), value);
    }

    if errors.is_empty() {
        for refinement in schema.refinements() {
            if !refinement_holds(refinement, &cleaned) {
                errors.push(refinement.field, refinement.message);
            }
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

enum Coerced {
    Absent,
    Invalid,
    Present(Value),
}

fn coerce(kind: FieldKind, raw: &Value) -> Coerced {
    let raw = match raw {
        Value::Null => return Coerced::Absent,
        Value::String(s) if s.trim().is_empty() => return Coerced::Absent,
        Value::Array(items) if items.is_empty() => return Coerced::Absent,
        other => other,
    };

    match kind {
        FieldKind::Text => match raw {
            Value::String(s) => Coerced::Present(Value::String(s.trim().to_string())),
            Value::Number(n) => Coerced::Present(Value::String(n.to_string())),
            Value::Bool(b) => Coerced::Present(Value::String(b.to_string())),
            _ => Coerced::Invalid,
        },
        FieldKind::Integer => match raw {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Coerced::Present(Value::from(i)),
                None => whole_number(n.as_f64()),
            },
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => Coerced::Present(Value::from(i)),
                Err(_) => whole_number(s.trim().parse::<f64>().ok()),
            },
            _ => Coerced::Invalid,
        },
        FieldKind::Number => {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match number.and_then(Number::from_f64) {
                Some(n) => Coerced::Present(Value::Number(n)),
                None => Coerced::Invalid,
            }
        }
        FieldKind::Boolean => match raw {
            Value::Bool(b) => Coerced::Present(Value::Bool(*b)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Coerced::Present(Value::Bool(true)),
                "false" | "off" | "0" | "no" => Coerced::Present(Value::Bool(false)),
                _ => Coerced::Invalid,
            },
            _ => Coerced::Invalid,
        },
        FieldKind::Date => match raw {
            Value::String(s) => match parse_date(s.trim()) {
                Some(date) => Coerced::Present(Value::String(date.to_string())),
                None => Coerced::Invalid,
            },
            _ => Coerced::Invalid,
        },
        FieldKind::List => {
            let items = match raw {
                Value::Array(items) => items.as_slice(),
                single => std::slice::from_ref(single),
            };

            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) if s.trim().is_empty() => {}
                    Value::String(s) => list.push(Value::String(s.trim().to_string())),
                    Value::Number(n) => list.push(Value::String(n.to_string())),
                    _ => return Coerced::Invalid,
                }
            }

            if list.is_empty() {
                Coerced::Absent
            } else {
                Coerced::Present(Value::Array(list))
            }
        }
    }
}

fn whole_number(value: Option<f64>) -> Coerced {
    match value {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Coerced::Present(Value::from(f as i64))
        }
        _ => Coerced::Invalid,
    }
}

fn parse_date(s: &str) -> Option<Date> {
    if let Ok(date) = s.parse::<Date>() {
        return Some(date);
    }

    s.parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
}

fn refinement_holds(refinement: &Refinement, values: &FormValues) -> bool {
    let (Some(left), Some(right)) = (values.get(refinement.field), values.get(other(refinement)))
    else {
        return true;
    };

    match refinement.check {
        RefinementCheck::Matches { .. } => left == right,
        RefinementCheck::Differs { .. } => left != right,
        RefinementCheck::NotBefore { .. } => {
            let left = left.as_str().and_then(|s| s.parse::<Date>().ok());
            let right = right.as_str().and_then(|s| s.parse::<Date>().ok());
            match (left, right) {
                (Some(left), Some(right)) => left >= right,
                _ => true,
            }
        }
    }
}

fn other(refinement: &Refinement) -> &'static str {
    match refinement.check {
        RefinementCheck::Matches { other }
        | RefinementCheck::Differs { other }
        | RefinementCheck::NotBefore { other } => other,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn values(value: Value) -> FormValues {
        match value {
            Value::Object(map) => map,
            _ => FormValues::new(),
        }
    }

    fn schema() -> Schema {
        Schema::new("sample")
            .field(Field::text("name").required("Name is required").min_len(2, "Too short"))
            .field(Field::integer("count").required("Count is required").min(1.0, "Too few"))
            .field(Field::text("note").max_len(5, "Too long"))
            .field(Field::list("tags"))
            .field(Field::boolean("agree"))
            .field(Field::date("from"))
            .field(Field::date("to"))
            .refine("to", RefinementCheck::NotBefore { other: "from" }, "End before start")
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
        note: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
        agree: Option<bool>,
    }

    #[test]
    fn valid_input_is_trimmed_and_typed() {
        let input = values(json!({
            "name": "  Ada  ",
            "count": "3",
            "note": "   ",
            "tags": ["a", " ", "b "],
            "agree": "on",
            "unknown": "dropped"
        }));

        let result = validate::<Sample>(&schema(), &input);
        assert_eq!(
            result,
            ValidationResult::Valid(Sample {
                name: "Ada".into(),
                count: 3,
                note: None,
                tags: vec!["a".into(), "b".into()],
                agree: Some(true),
            })
        );
    }

    #[test]
    fn required_and_invalid_messages() {
        let input = values(json!({ "name": "", "count": "three" }));
        let errors = normalize(&schema(), &input).unwrap_err();

        assert_eq!(errors.first("name"), Some("Name is required"));
        assert_eq!(errors.first("count"), Some("Must be a whole number"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn single_violation_reports_single_field() {
        let input = values(json!({ "name": "Ada", "count": 0 }));
        let errors = normalize(&schema(), &input).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["count"]);
        assert_eq!(errors.first("count"), Some("Too few"));
    }

    #[test]
    fn every_failing_rule_is_kept_in_order() {
        let schema = Schema::new("pw").field(
            Field::text("password")
                .min_len(8, "min")
                .rule(Check::OneOf(&["x"]), "one of"),
        );
        let errors = normalize(&schema, &values(json!({ "password": "abc" }))).unwrap_err();
        assert_eq!(errors.get("password").unwrap(), ["min", "one of"]);
    }

    #[test]
    fn refinements_wait_for_clean_fields() {
        let input = values(json!({
            "name": "Ada", "count": 1, "from": "2025-05-10", "to": "2025-05-01"
        }));
        let errors = normalize(&schema(), &input).unwrap_err();
        assert_eq!(errors.first("to"), Some("End before start"));

        let input = values(json!({
            "name": "A", "count": 1, "from": "2025-05-10", "to": "2025-05-01"
        }));
        let errors = normalize(&schema(), &input).unwrap_err();
        assert!(errors.contains("name"));
        assert!(!errors.contains("to"));
    }

    #[test]
    fn dates_accept_timestamps() {
        let input = values(json!({
            "name": "Ada", "count": 1, "from": "2025-05-01T22:00:00Z", "to": "2025-05-01"
        }));
        let cleaned = normalize(&schema(), &input).unwrap();
        assert_eq!(cleaned["from"], json!("2025-05-01"));
    }

    #[test]
    fn fractional_integer_is_invalid() {
        let input = values(json!({ "name": "Ada", "count": 1.5 }));
        let errors = normalize(&schema(), &input).unwrap_err();
        assert_eq!(errors.first("count"), Some("Must be a whole number"));

        let input = values(json!({ "name": "Ada", "count": "2.0" }));
        assert!(normalize(&schema(), &input).is_ok());
    }
}
