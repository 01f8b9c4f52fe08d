//! Shared validation helpers for inbound HTTP adapters.

use serde_json::{json, Value};

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Parse the release year from a JSON number or a numeric string.
pub(crate) fn parse_year(value: &Value, field: FieldName) -> Result<i32, Error> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().and_then(|raw| i32::try_from(raw).ok()),
        Value::String(raw) => raw.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::invalid_request("Year must be a valid number").with_details(json!({
            "field": field.as_str(),
            "code": "invalid_year",
        }))
    })
}
