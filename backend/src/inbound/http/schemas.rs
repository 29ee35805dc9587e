//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The player may not do this yet, e.g. open a locked problem.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The hosted backend or model endpoint is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please verify your code before submitting.")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "0b9a4a8e-3a51-4d0a-9bde-2a7f1c1d9e3f")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Tier`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Tier)]
pub enum TierSchema {
    #[schema(rename = "easy")]
    Easy,
    #[schema(rename = "medium")]
    Medium,
    #[schema(rename = "hard")]
    Hard,
}

/// OpenAPI schema for [`crate::domain::TierStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TierStatus)]
pub enum TierStatusSchema {
    #[schema(rename = "locked")]
    Locked,
    #[schema(rename = "unlocked")]
    Unlocked,
    #[schema(rename = "solved")]
    Solved,
}

/// OpenAPI schema for [`crate::domain::Language`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Language)]
pub enum LanguageSchema {
    #[schema(rename = "python")]
    Python,
    #[schema(rename = "java")]
    Java,
    #[schema(rename = "cpp")]
    Cpp,
}

/// Discriminator of [`ViewSchema`].
#[derive(ToSchema)]
pub enum ViewKindSchema {
    #[schema(rename = "login")]
    Login,
    #[schema(rename = "home")]
    Home,
    #[schema(rename = "editor")]
    Editor,
    #[schema(rename = "leaderboard")]
    Leaderboard,
    #[schema(rename = "notFound")]
    NotFound,
}

/// OpenAPI schema for [`crate::domain::View`].
///
/// `problem` is present only for the `editor` view.
#[derive(ToSchema)]
#[schema(as = crate::domain::View)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ViewSchema {
    kind: ViewKindSchema,
    #[schema(example = "reverseString")]
    problem: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_wire_codes(#[case] code: &str) {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert!(schema_to_json::<ErrorCodeSchema>().contains(code));
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("message"));
    }

    #[test]
    fn tier_schemas_use_lowercase_names() {
        let tiers = schema_to_json::<TierSchema>();
        assert!(tiers.contains("\"medium\""));
        let statuses = schema_to_json::<TierStatusSchema>();
        assert!(statuses.contains("\"locked\""));
        assert!(schema_to_json::<LanguageSchema>().contains("\"cpp\""));
    }

    #[test]
    fn view_schema_names_the_discriminator() {
        assert_eq!(ViewSchema::name(), "crate.domain.View");
        let json = schema_to_json::<ViewSchema>();
        assert!(json.contains("kind"));
        assert!(schema_to_json::<ViewKindSchema>().contains("\"notFound\""));
    }
}
