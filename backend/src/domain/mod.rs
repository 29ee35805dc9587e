//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP adapter
//! and the hosted-backend adapters. Keep types immutable where possible and
//! document invariants and serialisation contracts (serde) in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Tier, Problem, ProblemCatalogue — the three challenges and their order.
//! - TierDurations, SolvedTiers, Player — recorded progress and unlock rules.
//! - Route, View, resolve — page routing with unlock gating.
//! - Attempt, Verdict, VerificationPrompt — timing and verification.
//! - EditorBuffer, KeyPress, EditorCommand — editor key handling.
//! - rank_rows, LeaderboardEntry — leaderboard ordering.

pub mod account_service;
pub mod attempt;
pub mod auth;
pub mod editor;
pub mod error;
pub mod language;
pub mod leaderboard;
pub mod navigation;
pub mod ports;
pub mod problem;
pub mod progress;
pub mod progress_service;
pub mod standings_service;
pub mod tier;
pub mod trace_id;
pub mod user;
pub mod verification;
pub mod verification_service;

pub use self::account_service::{
    AccountService, BACKEND_UNCONFIGURED, EMAIL_CONFIRMATION_REQUIRED, INVALID_LOGIN,
    USERNAME_TAKEN,
};
pub use self::attempt::{Attempt, CodeDigest, VERIFY_BEFORE_SUBMIT, format_elapsed};
pub use self::auth::{
    AccessToken, AuthSession, AuthenticatedUser, Credentials, CredentialsValidationError,
    SignUpOutcome, SignUpResult,
};
pub use self::editor::{EditorBuffer, EditorCommand, EditorError, KeyPress};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::language::{Language, UnsupportedLanguage};
pub use self::leaderboard::{ANONYMOUS, LeaderboardEntry, LeaderboardRow, rank_rows};
pub use self::navigation::{Navigation, Route, View, problem_path, resolve};
pub use self::problem::{Problem, ProblemCatalogue, ProblemId, ProblemIdValidationError};
pub use self::progress::{Player, SolvedTiers, TierDurations, TierStatus};
pub use self::progress_service::ProgressService;
pub use self::standings_service::StandingsService;
pub use self::tier::{Tier, UnknownTier};
pub use self::trace_id::TraceId;
pub use self::user::{Email, USERNAME_MAX, UserId, UserProfile, UserValidationError, Username};
pub use self::verification::{Verdict, VerificationPrompt, VerificationRequest};
pub use self::verification_service::VerificationService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use coderush::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
