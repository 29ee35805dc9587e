//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer, including the
//!   `verify-code` procedure and the health probes
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`TierSchema`],
//!   [`ViewSchema`] and friends) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, LanguageSchema, TierSchema, TierStatusSchema, ViewKindSchema,
    ViewSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or POST /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CodeRush backend API",
        description = "Tiered coding challenges: sessions, unlock gating, timed attempts, \
model-judged verification and the leaderboard.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_player,
        crate::inbound::http::problems::list_problems,
        crate::inbound::http::navigation::navigate,
        crate::inbound::http::attempts::start_attempt,
        crate::inbound::http::attempts::current_attempt,
        crate::inbound::http::attempts::verify_attempt,
        crate::inbound::http::attempts::submit_attempt,
        crate::inbound::http::leaderboard::leaderboard,
        crate::inbound::http::editor::editor_key,
        crate::inbound::http::verify_code::verify_code_preflight,
        crate::inbound::http::verify_code::verify_code,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        TierSchema,
        TierStatusSchema,
        LanguageSchema,
        ViewSchema,
        ViewKindSchema
    )),
    tags(
        (name = "users", description = "Sign-in, sign-up and the current player"),
        (name = "problems", description = "Problem list and unlock status"),
        (name = "navigation", description = "Client route guards"),
        (name = "attempts", description = "Timed attempts, verification and submission"),
        (name = "leaderboard", description = "Ranked standings"),
        (name = "editor", description = "Editor key handling"),
        (name = "functions", description = "Serverless-function compatible procedures"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
