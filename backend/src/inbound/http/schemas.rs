//! OpenAPI shapes for the domain error payload.
//!
//! `domain::Error` and `domain::ErrorCode` carry no utoipa derives, so the
//! adapter registers stand-ins under their names for the generated document.

use utoipa::ToSchema;

/// Machine-readable code carried by every error body.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Bad quantity, duplicate names, missing ingredients or empty text.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Missing or unknown bearer token, or bad credentials.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller is neither the administrator nor the author.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Recipe, comment or ingredient does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Taken username or catalogue name, or an ingredient still in use.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error body returned by every endpoint on failure.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Fields exist only for schema generation")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Ingredients must exist before use: kale")]
    message: String,
    /// Matches the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context, such as the list of missing ingredient names.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises")
    }

    #[rstest]
    #[case(ErrorCode::InvalidRequest)]
    #[case(ErrorCode::Unauthorized)]
    #[case(ErrorCode::Forbidden)]
    #[case(ErrorCode::NotFound)]
    #[case(ErrorCode::Conflict)]
    #[case(ErrorCode::ServiceUnavailable)]
    #[case(ErrorCode::InternalError)]
    fn every_domain_code_is_documented(#[case] code: ErrorCode) {
        let wire = serde_json::to_value(code).expect("code serialises");
        let wire = wire.as_str().expect("codes serialise as strings");
        assert!(
            schema_json::<ErrorCodeSchema>().contains(wire),
            "{wire} missing from the schema"
        );
    }

    #[rstest]
    fn error_body_uses_camel_case_trace_id() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(!json.contains("trace_id"));
    }
}
