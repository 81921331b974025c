//! Declarative schema description: fields, ordered rules and refinements.

use regex::Regex;
use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

/// How a raw form value is coerced before rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed string.
    Text,
    /// Whole number, from a JSON number or a numeric string.
    Integer,
    /// Finite number, from a JSON number or a numeric string.
    Number,
    /// `true`/`false`, also `on`/`off` and `1`/`0` from HTML forms.
    Boolean,
    /// Calendar date (`YYYY-MM-DD` or an RFC 3339 timestamp).
    Date,
    /// List of trimmed strings; a single string becomes a one-item list.
    List,
}

/// A single predicate checked against a coerced value.
#[derive(Debug, Clone)]
pub enum Check {
    /// At least `n` characters, or `n` items for lists.
    MinLength(usize),
    /// At most `n` characters, or `n` items for lists.
    MaxLength(usize),
    /// Inclusive lower bound.
    Min(f64),
    /// Inclusive upper bound.
    Max(f64),
    /// Syntactically valid email address.
    Email,
    /// Absolute URL.
    Url,
    /// Matches the pattern somewhere in the value.
    Pattern(Regex),
    /// Exactly one of the listed strings.
    OneOf(&'static [&'static str]),
}

impl Check {
    /// Returns `true` when `value` satisfies the check.
    ///
    /// A check that does not apply to the value's shape passes; shape
    /// problems are reported by coercion instead.
    pub fn passes(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::MinLength(n), Value::String(s)) => s.chars().count() >= *n,
            (Self::MaxLength(n), Value::String(s)) => s.chars().count() <= *n,
            (Self::MinLength(n), Value::Array(items)) => items.len() >= *n,
            (Self::MaxLength(n), Value::Array(items)) => items.len() <= *n,
            (Self::Min(bound), Value::Number(n)) => n.as_f64().is_some_and(|n| n >= *bound),
            (Self::Max(bound), Value::Number(n)) => n.as_f64().is_some_and(|n| n <= *bound),
            (Self::Email, Value::String(s)) => s.validate_email(),
            (Self::Url, Value::String(s)) => s.validate_url(),
            (Self::Pattern(regex), Value::String(s)) => regex.is_match(s),
            (Self::OneOf(options), Value::String(s)) => options.contains(&s.as_str()),
            _ => true,
        }
    }
}

/// A check paired with the message reported when it fails.
#[derive(Debug, Clone)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

/// One named input of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) required: Option<&'static str>,
    pub(crate) invalid: &'static str,
    pub(crate) rules: Vec<Rule>,
}

impl Field {
    /// Creates an optional field of the given kind.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        let invalid = match kind {
            FieldKind::Text | FieldKind::List => "Invalid value",
            FieldKind::Integer => "Must be a whole number",
            FieldKind::Number => "Must be a number",
            FieldKind::Boolean => "Must be true or false",
            FieldKind::Date => "Please enter a valid date",
        };

        Self {
            name,
            kind,
            required: None,
            invalid,
            rules: Vec::new(),
        }
    }

    /// Creates an optional text field.
    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Creates an optional whole-number field.
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Creates an optional numeric field.
    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Creates an optional boolean field.
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Creates an optional date field.
    pub fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Creates an optional list field.
    pub fn list(name: &'static str) -> Self {
        Self::new(name, FieldKind::List)
    }

    /// Makes the field required, reporting `message` when it is absent.
    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    /// Sets the message reported when coercion fails.
    pub fn invalid(mut self, message: &'static str) -> Self {
        self.invalid = message;
        self
    }

    /// Appends a rule. Rules run in the order they are added.
    pub fn rule(mut self, check: Check, message: &'static str) -> Self {
        self.rules.push(Rule { check, message });
        self
    }

    /// Requires at least `n` characters or items.
    pub fn min_len(self, n: usize, message: &'static str) -> Self {
        self.rule(Check::MinLength(n), message)
    }

    /// Allows at most `n` characters or items.
    pub fn max_len(self, n: usize, message: &'static str) -> Self {
        self.rule(Check::MaxLength(n), message)
    }

    /// Requires a value of at least `bound`.
    pub fn min(self, bound: f64, message: &'static str) -> Self {
        self.rule(Check::Min(bound), message)
    }

    /// Requires a value of at most `bound`.
    pub fn max(self, bound: f64, message: &'static str) -> Self {
        self.rule(Check::Max(bound), message)
    }

    /// Requires a valid email address.
    pub fn email(self, message: &'static str) -> Self {
        self.rule(Check::Email, message)
    }

    /// Requires an absolute URL.
    pub fn url(self, message: &'static str) -> Self {
        self.rule(Check::Url, message)
    }

    /// Requires a match of `regex`.
    pub fn pattern(self, regex: &Regex, message: &'static str) -> Self {
        self.rule(Check::Pattern(regex.clone()), message)
    }

    /// Requires one of `options`.
    pub fn one_of(self, options: &'static [&'static str], message: &'static str) -> Self {
        self.rule(Check::OneOf(options), message)
    }

    /// Returns the field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the field is required.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }
}

/// Cross-field predicate evaluated after every field passed.
#[derive(Debug, Clone, Copy)]
pub enum RefinementCheck {
    /// `field` equals `other`.
    Matches { other: &'static str },
    /// `field` differs from `other`.
    Differs { other: &'static str },
    /// Date `field` is the same day as or after date `other`.
    NotBefore { other: &'static str },
}

/// Object-level rule whose message is reported on `field`.
///
/// Refinements are skipped when either side is absent.
#[derive(Debug, Clone, Copy)]
pub struct Refinement {
    pub field: &'static str,
    pub check: RefinementCheck,
    pub message: &'static str,
}

/// Ordered fields plus ordered refinements.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    refinements: Vec<Refinement>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a refinement.
    pub fn refine(
        mut self,
        field: &'static str,
        check: RefinementCheck,
        message: &'static str,
    ) -> Self {
        self.refinements.push(Refinement {
            field,
            check,
            message,
        });
        self
    }

    /// Returns a copy where every field is optional.
    ///
    /// Used for partial updates: whatever is supplied is still checked.
    pub fn partial(&self, name: &'static str) -> Self {
        let fields = self
            .fields
            .iter()
            .cloned()
            .map(|field| Field {
                required: None,
                ..field
            })
            .collect();

        Self {
            name,
            fields,
            refinements: self.refinements.clone(),
        }
    }

    /// Returns the schema name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fields in order.
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the refinements in order.
    #[inline]
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }
}
