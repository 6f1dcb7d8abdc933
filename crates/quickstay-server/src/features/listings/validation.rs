//! Listing payload schema and identifier checks

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::types::{ListingPatch, ListingType, NewListing, PropertyType};
use crate::features::shared::validation::{FieldSpec, FieldViolation, Mode, Rule, Schema};

/// Maximum length of short text columns.
pub const MAX_TEXT_CHARS: usize = 255;

/// Largest value that fits NUMERIC(10,2).
pub const MAX_PRICE: f64 = 99_999_999.99;

const SHORT_TEXT: &[Rule] = &[Rule::Text, Rule::NonBlank, Rule::MaxChars(MAX_TEXT_CHARS)];
const OPTIONAL_SHORT_TEXT: &[Rule] = &[Rule::Text, Rule::MaxChars(MAX_TEXT_CHARS)];

/// Shared by create (required fields enforced) and update (all optional).
pub const LISTING_SCHEMA: Schema = Schema::new(&[
    FieldSpec::required("name", SHORT_TEXT),
    FieldSpec::required("propertyName", SHORT_TEXT),
    FieldSpec::required("type", &[Rule::Text, Rule::OneOf(ListingType::NAMES)]),
    FieldSpec::required("propertyType", &[Rule::Text, Rule::OneOf(PropertyType::NAMES)]),
    FieldSpec::required("address", SHORT_TEXT),
    FieldSpec::required("price", &[Rule::Number, Rule::Positive, Rule::AtMost(MAX_PRICE)]),
    FieldSpec::nullable("rating", &[Rule::Number, Rule::Between(0.0, 5.0)]),
    FieldSpec::nullable("description", &[Rule::Text]),
    FieldSpec::optional("verified", &[Rule::Boolean]),
    FieldSpec::optional("isActive", &[Rule::Boolean]),
    FieldSpec::optional("amenities", &[Rule::StringList]),
    FieldSpec::optional("images", &[Rule::StringList]),
    FieldSpec::nullable("email", &[Rule::Text, Rule::Email]),
    FieldSpec::nullable("phone", OPTIONAL_SHORT_TEXT),
    FieldSpec::nullable("googleMapLink", OPTIONAL_SHORT_TEXT),
]);

/// Validate a create payload and convert it to a typed [`NewListing`].
pub fn validate_new_listing(payload: &Value) -> Result<NewListing, Vec<FieldViolation>> {
    validate_into(payload, Mode::Create)
}

/// Validate an update payload and convert it to a typed [`ListingPatch`].
pub fn validate_patch(payload: &Value) -> Result<ListingPatch, Vec<FieldViolation>> {
    validate_into(payload, Mode::Update)
}

fn validate_into<T: DeserializeOwned>(payload: &Value, mode: Mode) -> Result<T, Vec<FieldViolation>> {
    let object = LISTING_SCHEMA.validate(payload, mode)?;

    // Only declared keys are forwarded so unknown fields never reach serde.
    let declared: serde_json::Map<String, Value> = LISTING_SCHEMA
        .fields()
        .iter()
        .filter_map(|spec| {
            object
                .get(spec.name)
                .map(|value| (spec.name.to_string(), value.clone()))
        })
        .collect();

    serde_json::from_value(Value::Object(declared))
        .map_err(|e| vec![FieldViolation::new("body", e.to_string())])
}

/// Parse a path identifier, reporting a violation on `id` when malformed.
pub fn parse_listing_id(raw: &str) -> Result<Uuid, Vec<FieldViolation>> {
    Uuid::parse_str(raw.trim()).map_err(|_| vec![FieldViolation::new("id", "id must be a valid UUID")])
}
