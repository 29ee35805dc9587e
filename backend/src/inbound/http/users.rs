//! Account API handlers.
//!
//! ```text
//! POST /api/v1/login  {"username":"ada","email":"ada@example.com","password":"pw"}
//! POST /api/v1/signup {"username":"ada","email":"ada@example.com","password":"pw"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    AccessToken, AuthenticatedUser, Credentials, CredentialsValidationError,
    EMAIL_CONFIRMATION_REQUIRED, Error, Player, SignUpOutcome, SolvedTiers, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/login` and `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Solved flags per tier.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct SolvedResponse {
    pub easy: bool,
    pub medium: bool,
    pub hard: bool,
}

impl From<SolvedTiers> for SolvedResponse {
    fn from(value: SolvedTiers) -> Self {
        Self {
            easy: value.easy,
            medium: value.medium,
            hard: value.hard,
        }
    }
}

/// The signed-in player as stored in the session.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub name: String,
    pub solved: SolvedResponse,
    pub solved_count: usize,
    #[schema(example = "reverseString")]
    pub active_problem: Option<String>,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.clone(),
            solved: player.solved.into(),
            solved_count: player.solved.solved_count(),
            active_problem: player.active_problem.as_ref().map(ToString::to_string),
        }
    }
}

/// `202` body when the new account must confirm its e-mail first.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPendingResponse {
    pub message: String,
    pub user_id: Option<String>,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::Username(UserValidationError::UsernameTooLong { .. }) => {
            ("username", "username_too_long")
        }
        CredentialsValidationError::Username(_) => ("username", "empty_username"),
        CredentialsValidationError::Email(UserValidationError::EmptyEmail) => {
            ("email", "empty_email")
        }
        CredentialsValidationError::Email(_) => ("email", "invalid_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Re-derive solved flags from the stored durations.
///
/// A failed read leaves the session's flags untouched.
pub(crate) async fn refresh_progress(
    state: &HttpState,
    session: &SessionContext,
    mut player: Player,
    token: &AccessToken,
) -> Player {
    match state.progress_query.durations(&player.id, token).await {
        Ok(durations) => {
            player.solved = durations.solved();
            session.save_player(&player);
        }
        Err(error) => {
            debug!(user_id = %player.id, error = %error, "progress sync skipped");
        }
    }
    player
}

async fn establish(
    state: &HttpState,
    session: &SessionContext,
    user: &AuthenticatedUser,
) -> PlayerResponse {
    let player = session.sign_in(user);
    let player = refresh_progress(state, session, player, &user.access_token).await;
    PlayerResponse::from(&player)
}

/// Sign in with username, e-mail and password.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = PlayerResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid email or password", body = ErrorSchema),
        (status = 409, description = "Profile conflict", body = ErrorSchema),
        (status = 503, description = "Hosted backend unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<PlayerResponse>> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user = state.accounts.login(&credentials).await?;
    Ok(web::Json(establish(&state, &session, &user).await))
}

/// Create an account and sign in when the hosted backend allows it.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed up and signed in", body = PlayerResponse),
        (status = 202, description = "E-mail confirmation required", body = SignUpPendingResponse),
        (status = 400, description = "Invalid request or rejected by the hosted backend", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "Hosted backend unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    match state.accounts.sign_up(&credentials).await? {
        SignUpOutcome::SignedIn(user) => {
            Ok(HttpResponse::Ok().json(establish(&state, &session, &user).await))
        }
        SignUpOutcome::VerificationRequired { user_id } => {
            Ok(HttpResponse::Accepted().json(SignUpPendingResponse {
                message: EMAIL_CONFIRMATION_REQUIRED.to_owned(),
                user_id: user_id.map(String::from),
            }))
        }
    }
}

/// Sign out and clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    match session.access_token() {
        Some(token) => state.accounts.logout(&token).await,
        None => debug!("logout without a stored access token"),
    }
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The signed-in player with solved flags re-synced from the profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current player", body = PlayerResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentPlayer"
)]
#[get("/me")]
pub async fn current_player(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PlayerResponse>> {
    let (player, token) = session.require_credentials()?;
    let player = refresh_progress(&state, &session, player, &token).await;
    Ok(web::Json(PlayerResponse::from(&player)))
}
