//! Shared validation helpers for inbound HTTP adapters.
//!
//! Payload shape problems are reported before any port is called, with a
//! `details` object naming the offending field.

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Reject a present but unusable value. `message` is shown to the caller.
pub(crate) fn invalid_value_error(
    field: FieldName,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

/// Unwrap an optional payload field or report it as missing.
pub(crate) fn require_field<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    const TITLE: FieldName = FieldName::new("title");

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require_field::<String>(None, TITLE).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "missing required field: title");
        assert_eq!(detail(&err, "field"), Some("title"));
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    fn present_fields_pass_through() {
        let value = require_field(Some(3), TITLE).expect("present");
        assert_eq!(value, 3);
    }

    #[rstest]
    fn invalid_values_echo_the_input() {
        let err = invalid_value_error(FieldName::new("scope"), "Invalid scope", "bogus");
        assert_eq!(err.message(), "Invalid scope");
        assert_eq!(detail(&err, "value"), Some("bogus"));
        assert_eq!(detail(&err, "code"), Some("invalid_value"));
    }
}
