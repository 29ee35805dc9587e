//! Editor attempt handlers: start, inspect, verify and submit.
//!
//! ```text
//! POST /api/v1/problems/{id}/attempt
//! GET  /api/v1/attempt
//! POST /api/v1/attempt/verify {"code":"...","language":"python"}
//! POST /api/v1/attempt/submit {"code":"..."}
//! ```
//!
//! The attempt lives in the session. Its start time is taken from the state's
//! clock, and a submission is accepted only for code that the last
//! verification judged correct.

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{
    Attempt, Error, Language, Player, Problem, Route, Tier, VerificationRequest, format_elapsed,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::PlayerResponse;

pub const NO_ACTIVE_PROBLEM: &str = "No active problem selected.";
pub const CODE_INCORRECT: &str = "Code incorrect. Please fix before submitting.";
pub const VERIFICATION_FAILED: &str = "Verification failed. Please try again.";
pub const PROBLEM_LOCKED: &str = "Complete the previous challenge to unlock this problem.";
const PROBLEM_NOT_FOUND: &str = "Problem not found.";

/// Snapshot of the active attempt.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    #[schema(example = "reverseString")]
    pub problem_id: String,
    #[schema(value_type = crate::inbound::http::schemas::TierSchema)]
    pub tier: Tier,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, format = DateTime)]
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[schema(example = "01:30")]
    pub elapsed: String,
    pub verified: bool,
}

impl AttemptResponse {
    fn new(attempt: &Attempt, problem: &Problem, now: DateTime<Utc>) -> Self {
        let elapsed_ms = attempt.elapsed_ms(now);
        Self {
            problem_id: problem.id.to_string(),
            tier: problem.tier,
            title: problem.title.clone(),
            description: problem.description.clone(),
            started_at: attempt.started_at,
            elapsed_ms,
            elapsed: format_elapsed(elapsed_ms),
            verified: attempt.is_verified(),
        }
    }
}

/// Body for `POST /api/v1/attempt/verify`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub code: String,
    #[serde(default)]
    #[schema(value_type = Option<crate::inbound::http::schemas::LanguageSchema>)]
    pub language: Option<String>,
}

/// Verdict for the submitted snapshot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_correct: bool,
    pub message: Option<String>,
}

/// Body for `POST /api/v1/attempt/submit`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub code: String,
}

/// Accepted submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[schema(value_type = crate::inbound::http::schemas::TierSchema)]
    pub tier: Tier,
    pub duration_ms: u64,
    #[schema(example = "04:12")]
    pub elapsed: String,
    pub player: PlayerResponse,
    #[schema(example = "/")]
    pub redirect: String,
}

/// Start an attempt on `problem`, or keep the running one if it is for the
/// same problem. The player's active problem follows.
pub(crate) fn begin_attempt(
    state: &HttpState,
    session: &SessionContext,
    player: &mut Player,
    problem: &Problem,
) -> Result<Attempt, Error> {
    if !player.solved.is_unlocked(problem.tier) {
        return Err(Error::forbidden(PROBLEM_LOCKED));
    }

    let attempt = match session.attempt() {
        Some(existing) if existing.problem == problem.id => existing,
        _ => {
            let attempt = Attempt::start(problem.id.clone(), problem.tier, state.clock.utc());
            info!(user_id = %player.id, problem = %problem.id, "attempt started");
            session.save_attempt(&attempt);
            attempt
        }
    };

    if player.active_problem.as_ref() != Some(&problem.id) {
        player.active_problem = Some(problem.id.clone());
        session.save_player(player);
    }
    Ok(attempt)
}

fn active_attempt(session: &SessionContext) -> Result<Attempt, Error> {
    session
        .attempt()
        .ok_or_else(|| Error::conflict(NO_ACTIVE_PROBLEM))
}

fn attempt_problem<'a>(state: &'a HttpState, attempt: &Attempt) -> Result<&'a Problem, Error> {
    state
        .catalogue
        .find(attempt.problem.as_ref())
        .ok_or_else(|| Error::not_found(PROBLEM_NOT_FOUND))
}

/// Open the editor on a problem.
#[utoipa::path(
    post,
    path = "/api/v1/problems/{id}/attempt",
    params(("id" = String, Path, description = "Problem id", example = "findPairSum")),
    responses(
        (status = 200, description = "Attempt running", body = AttemptResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Problem locked", body = ErrorSchema),
        (status = 404, description = "Unknown problem", body = ErrorSchema)
    ),
    tags = ["attempts"],
    operation_id = "startAttempt"
)]
#[post("/problems/{id}/attempt")]
pub async fn start_attempt(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AttemptResponse>> {
    let mut player = session.require_player()?;
    let id = path.into_inner();
    let problem = state
        .catalogue
        .find(&id)
        .ok_or_else(|| Error::not_found(format!("unknown problem: {id}")))?;
    let attempt = begin_attempt(&state, &session, &mut player, problem)?;
    Ok(web::Json(AttemptResponse::new(
        &attempt,
        problem,
        state.clock.utc(),
    )))
}

/// Inspect the running attempt and its timer.
#[utoipa::path(
    get,
    path = "/api/v1/attempt",
    responses(
        (status = 200, description = "Running attempt", body = AttemptResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 409, description = "No active problem", body = ErrorSchema)
    ),
    tags = ["attempts"],
    operation_id = "currentAttempt"
)]
#[get("/attempt")]
pub async fn current_attempt(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AttemptResponse>> {
    session.require_player()?;
    let attempt = active_attempt(&session)?;
    let problem = attempt_problem(&state, &attempt)?;
    Ok(web::Json(AttemptResponse::new(
        &attempt,
        problem,
        state.clock.utc(),
    )))
}

/// Ask the model whether the code solves the active problem.
///
/// A failed model call is reported as an incorrect verdict with a retry hint.
#[utoipa::path(
    post,
    path = "/api/v1/attempt/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verdict", body = VerifyResponse),
        (status = 400, description = "Unsupported language", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 409, description = "No active problem", body = ErrorSchema)
    ),
    tags = ["attempts"],
    operation_id = "verifyAttempt"
)]
#[post("/attempt/verify")]
pub async fn verify_attempt(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<web::Json<VerifyResponse>> {
    session.require_player()?;
    let VerifyRequest { code, language } = payload.into_inner();
    let language = match language {
        Some(raw) => raw
            .parse::<Language>()
            .map_err(|err| Error::invalid_request(err.to_string()))?,
        None => Language::default(),
    };
    let mut attempt = active_attempt(&session)?;
    let problem = attempt_problem(&state, &attempt)?;

    let request = VerificationRequest::new(code.as_str(), problem.description.as_str(), language);
    let response = match state.verifier.verify(&request).await {
        Ok(verdict) => {
            attempt.record_verdict(&code, verdict);
            VerifyResponse {
                is_correct: verdict.is_correct(),
                message: (!verdict.is_correct()).then(|| CODE_INCORRECT.to_owned()),
            }
        }
        Err(error) => {
            warn!(problem = %problem.id, error = %error, "verification failed");
            attempt.invalidate();
            VerifyResponse {
                is_correct: false,
                message: Some(VERIFICATION_FAILED.to_owned()),
            }
        }
    };
    session.save_attempt(&attempt);
    Ok(web::Json(response))
}

/// Submit verified code, record the solve time and unlock the next tier.
///
/// Saving the time is best effort; the solve still counts if the hosted
/// backend rejects the write.
#[utoipa::path(
    post,
    path = "/api/v1/attempt/submit",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission accepted", body = SubmitResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 409, description = "Not verified for this code, or no active problem", body = ErrorSchema)
    ),
    tags = ["attempts"],
    operation_id = "submitAttempt"
)]
#[post("/attempt/submit")]
pub async fn submit_attempt(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<web::Json<SubmitResponse>> {
    let (mut player, token) = session.require_credentials()?;
    let attempt = active_attempt(&session)?;
    attempt.ensure_verified(&payload.code)?;

    let duration_ms = attempt.elapsed_ms(state.clock.utc());
    player.solved.mark_solved(attempt.tier);
    session.save_player(&player);
    session.clear_attempt();

    match state
        .progress
        .record_solve(&player.id, &token, attempt.tier, duration_ms)
        .await
    {
        Ok(_) => info!(
            user_id = %player.id,
            tier = %attempt.tier,
            duration_ms,
            "solve recorded"
        ),
        Err(error) => warn!(
            user_id = %player.id,
            tier = %attempt.tier,
            error = %error,
            "failed saving problem time"
        ),
    }

    Ok(web::Json(SubmitResponse {
        tier: attempt.tier,
        duration_ms,
        elapsed: format_elapsed(duration_ms),
        player: PlayerResponse::from(&player),
        redirect: Route::Home.path().to_owned(),
    }))
}

#[cfg(test)]
#[path = "attempts_tests.rs"]
mod tests;
