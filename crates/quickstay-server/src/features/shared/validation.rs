//! Shared validation utilities
//!
//! Payloads are checked against an explicit [`Schema`]: a list of fields, each
//! with a required flag, a nullable flag and an ordered list of [`Rule`]s.
//! Every field is checked and every violation is collected; the first failing
//! rule of a field stops checks for that field only.
//!
//! # Examples
//!
//! ```rust,ignore
//! use quickstay_server::features::shared::validation::{FieldSpec, Mode, Rule, Schema};
//!
//! const SCHEMA: Schema = Schema::new(&[
//!     FieldSpec::required("name", &[Rule::Text, Rule::NonBlank, Rule::MaxChars(255)]),
//!     FieldSpec::nullable("email", &[Rule::Text, Rule::Email]),
//! ]);
//!
//! let fields = SCHEMA.validate(&payload, Mode::Create)?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single failed check, reported to clients as `{field, message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One constraint on a present, non-null value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// JSON string
    Text,
    /// Non-empty after trimming
    NonBlank,
    /// At most this many characters
    MaxChars(usize),
    /// String equal to one of the listed values
    OneOf(&'static [&'static str]),
    /// JSON number
    Number,
    /// Strictly greater than zero once rounded to cents
    Positive,
    /// Inclusive bounds
    Between(f64, f64),
    /// Inclusive upper bound, compared after rounding to cents
    AtMost(f64),
    /// JSON boolean
    Boolean,
    /// Array whose elements are all strings
    StringList,
    /// Well-formed email address
    Email,
}

impl Rule {
    fn check(&self, field: &str, value: &Value) -> Result<(), String> {
        match *self {
            Rule::Text => match value {
                Value::String(_) => Ok(()),
                _ => Err(format!("{} must be a string", field)),
            },
            Rule::NonBlank => match value.as_str() {
                Some(s) if s.trim().is_empty() => Err(format!("{} must not be empty", field)),
                _ => Ok(()),
            },
            Rule::MaxChars(max) => match value.as_str() {
                Some(s) if s.chars().count() > max => {
                    Err(format!("{} must be at most {} characters", field, max))
                },
                _ => Ok(()),
            },
            Rule::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => Err(format!("{} must be one of: {}", field, allowed.join(", "))),
            },
            Rule::Number => match value.as_f64() {
                Some(n) if n.is_finite() => Ok(()),
                _ => Err(format!("{} must be a number", field)),
            },
            Rule::Positive => match value.as_f64() {
                Some(n) if round_cents(n) <= 0.0 => {
                    Err(format!("{} must be greater than 0", field))
                },
                _ => Ok(()),
            },
            Rule::Between(min, max) => match value.as_f64() {
                Some(n) if n < min || n > max => {
                    Err(format!("{} must be between {} and {}", field, min, max))
                },
                _ => Ok(()),
            },
            Rule::AtMost(max) => match value.as_f64() {
                Some(n) if round_cents(n) > max => {
                    Err(format!("{} must be at most {}", field, max))
                },
                _ => Ok(()),
            },
            Rule::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(format!("{} must be a boolean", field)),
            },
            Rule::StringList => match value {
                Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
                _ => Err(format!("{} must be an array of strings", field)),
            },
            Rule::Email => match value.as_str() {
                Some(s) if !is_valid_email(s) => {
                    Err(format!("{} must be a valid email address", field))
                },
                _ => Ok(()),
            },
        }
    }
}

/// Round to two decimal places, the precision amounts are stored with.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Declaration of one payload field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub nullable: bool,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    /// Must be present on create; never null
    pub const fn required(name: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            required: true,
            nullable: false,
            rules,
        }
    }

    /// May be absent; never null
    pub const fn optional(name: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            required: false,
            nullable: false,
            rules,
        }
    }

    /// May be absent or null
    pub const fn nullable(name: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            required: false,
            nullable: true,
            rules,
        }
    }
}

/// Whether required fields are enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    /// Every field optional; present fields still checked
    Update,
}

/// Explicit per-payload schema
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Check `payload` and return it as an object, or every violation found.
    ///
    /// Keys not declared in the schema are ignored.
    pub fn validate<'a>(
        &self,
        payload: &'a Value,
        mode: Mode,
    ) -> Result<&'a Map<String, Value>, Vec<FieldViolation>> {
        let Some(object) = payload.as_object() else {
            return Err(vec![FieldViolation::new(
                "body",
                "Request body must be a JSON object",
            )]);
        };

        let violations: Vec<FieldViolation> = self
            .fields
            .iter()
            .filter_map(|spec| check_field(spec, object.get(spec.name), mode))
            .collect();

        if violations.is_empty() {
            Ok(object)
        } else {
            Err(violations)
        }
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>, mode: Mode) -> Option<FieldViolation> {
    let enforce_required = spec.required && mode == Mode::Create;

    let message = match value {
        None if enforce_required => Some(format!("{} is required", spec.name)),
        None => None,
        Some(Value::Null) if spec.nullable => None,
        Some(Value::Null) if enforce_required => Some(format!("{} is required", spec.name)),
        Some(Value::Null) => Some(format!("{} must not be null", spec.name)),
        Some(value) => spec
            .rules
            .iter()
            .find_map(|rule| rule.check(spec.name, value).err()),
    };

    message.map(|message| FieldViolation::new(spec.name, message))
}

/// Minimal address check: one `@`, non-empty local part, dotted domain, no
/// whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
