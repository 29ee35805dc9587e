//! `verify-code` remote procedure.
//!
//! ```text
//! OPTIONS /functions/v1/verify-code
//! POST    /functions/v1/verify-code {"code":"...","problem":"...","language":"python"}
//! ```
//!
//! Mirrors the hosted serverless function the browser client calls directly,
//! so its envelope differs from the `/api/v1` surface: successes are
//! `{"is_correct": bool}`, every failure is `500 {"error": "..."}` and each
//! response carries CORS headers.

use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder, options, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::VerificationRequest;
use crate::inbound::http::state::HttpState;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "authorization, content-type, apikey, x-client-info";

/// CORS policy for the procedure.
#[derive(Debug, Clone)]
pub struct VerifyCodeCors {
    allowed_origin: String,
}

impl VerifyCodeCors {
    /// Policy answering with `allowed_origin`, e.g. `*` or one site origin.
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }

    fn apply(&self, mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
        builder
            .insert_header((
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                self.allowed_origin.as_str(),
            ))
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
            .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS));
        builder
    }
}

impl Default for VerifyCodeCors {
    fn default() -> Self {
        Self::new("*")
    }
}

/// Request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyCodeRequest {
    /// Source code to grade.
    pub code: String,
    /// Problem statement.
    pub problem: String,
    /// Language name, passed to the prompt as given.
    #[schema(example = "python")]
    pub language: String,
}

impl From<VerifyCodeRequest> for VerificationRequest {
    fn from(value: VerifyCodeRequest) -> Self {
        Self {
            code: value.code,
            problem: value.problem,
            language: value.language,
        }
    }
}

/// Successful verdict.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyCodeResponse {
    /// Whether the model judged the code correct.
    pub is_correct: bool,
}

/// Failure envelope.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyCodeError {
    /// Why grading did not happen.
    #[schema(example = "CODERUSH_CODESTRAL_API_URL or CODERUSH_CODESTRAL_API_KEY is not set")]
    pub error: String,
}

fn failure(cors: &VerifyCodeCors, message: impl Into<String>) -> HttpResponse {
    cors.apply(HttpResponse::InternalServerError())
        .json(VerifyCodeError {
            error: message.into(),
        })
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/functions/v1/verify-code",
    responses((status = 200, description = "Preflight accepted", body = String)),
    tags = ["functions"],
    operation_id = "verifyCodePreflight",
    security([])
)]
#[options("/verify-code")]
pub async fn verify_code_preflight(cors: web::Data<VerifyCodeCors>) -> HttpResponse {
    cors.apply(HttpResponse::Ok()).body("ok")
}

/// Ask the model whether `code` solves `problem`.
#[utoipa::path(
    post,
    path = "/functions/v1/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Verdict", body = VerifyCodeResponse),
        (status = 500, description = "Malformed body, missing configuration or upstream failure",
            body = VerifyCodeError)
    ),
    tags = ["functions"],
    operation_id = "verifyCode",
    security([])
)]
#[post("/verify-code")]
pub async fn verify_code(
    state: web::Data<HttpState>,
    cors: web::Data<VerifyCodeCors>,
    body: web::Bytes,
) -> HttpResponse {
    let request: VerifyCodeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            warn!(%error, "verify-code body rejected");
            return failure(&cors, error.to_string());
        }
    };
    let request = VerificationRequest::from(request);
    match state.verifier.verify(&request).await {
        Ok(verdict) => {
            info!(language = %request.language, ?verdict, "verify-code answered");
            cors.apply(HttpResponse::Ok()).json(VerifyCodeResponse {
                is_correct: verdict.is_correct(),
            })
        }
        Err(error) => {
            warn!(%error, "verify-code failed");
            failure(&cors, error.message())
        }
    }
}
