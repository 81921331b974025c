//! Field-keyed validation messages.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The primary message for one field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered mapping from field name to every message produced for it.
///
/// Paths are grouped by their first segment, so `tourPlan.0` and
/// `tourPlan[1]` both land under `tourPlan`. Fields keep the order in which
/// their first message arrived and messages keep production order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    /// Creates an empty set of errors.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for the field addressed by `path`.
    pub fn push(&mut self, path: &str, message: impl Into<String>) {
        let field = top_level_field(path);
        let message = message.into();

        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field.to_string(), vec![message])),
        }
    }

    /// Builder-style [`FieldErrors::push`].
    #[must_use]
    pub fn with(mut self, path: &str, message: impl Into<String>) -> Self {
        self.push(path, message);
        self
    }

    /// Appends every message of `other`, keeping its order.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.entries {
            for message in messages {
                self.push(&field, message);
            }
        }
    }

    /// Returns `true` when no message was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of fields with at least one message.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when `field` has at least one message.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns every message for `field`, in order.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Returns the primary (first) message for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns the field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the primary message of every field, in order.
    pub fn first_errors(&self) -> impl Iterator<Item = FieldError> + '_ {
        self.entries.iter().filter_map(|(field, messages)| {
            messages.first().map(|message| FieldError {
                field: field.clone(),
                message: message.clone(),
            })
        })
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Returns the first segment of a dotted or indexed path.
fn top_level_field(path: &str) -> &str {
    let end = path.find(['.', '[']).unwrap_or(path.len());
    &path[..end]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn groups_by_first_segment() {
        let errors = FieldErrors::new()
            .with("tourPlan.0", "Plan item is required")
            .with("tourPlan[2]", "Plan item is too long")
            .with("title", "Title is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("tourPlan").map(<[String]>::len), Some(2));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["tourPlan", "title"]);
    }

    #[test]
    fn first_message_is_primary() {
        let errors = FieldErrors::new()
            .with("password", "Password must be at least 8 characters")
            .with("password", "Password must contain at least 1 number");

        assert_eq!(
            errors.first("password"),
            Some("Password must be at least 8 characters")
        );

        let primary: Vec<_> = errors.first_errors().collect();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].field, "password");
    }

    #[test]
    fn serializes_in_insertion_order() {
        let errors = FieldErrors::new()
            .with("rating", "Rating must be at most 5")
            .with("comment", "Comment must be at least 10 characters");

        let text = serde_json::to_string(&errors).unwrap();
        assert!(text.find("rating").unwrap() < text.find("comment").unwrap());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "rating": ["Rating must be at most 5"],
                "comment": ["Comment must be at least 10 characters"]
            })
        );
    }

    #[test]
    fn extend_keeps_order() {
        let mut errors = FieldErrors::new().with("email", "Email is required");
        errors.extend(FieldErrors::new().with("email", "Email is taken").with("name", "x"));

        assert_eq!(errors.get("email").map(<[String]>::len), Some(2));
        assert!(errors.contains("name"));
    }
}
