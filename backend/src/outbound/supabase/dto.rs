//! Wire payloads exchanged with the hosted auth (GoTrue) and REST
//! (PostgREST) endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ProfileIdentity;
use crate::domain::{AccessToken, AuthSession, SignUpResult, TierDurations, UserId};

/// Body for `POST /auth/v1/token?grant_type=password`.
#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for `POST /auth/v1/signup`.
#[derive(Debug, Serialize)]
pub(super) struct SignUpRequestDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadataDto<'a>,
}

/// User metadata stored alongside a new account.
#[derive(Debug, Serialize)]
pub(super) struct SignUpMetadataDto<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub id: String,
}

/// Session returned by a successful password grant.
#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub access_token: String,
    pub user: AuthUserDto,
}

impl SessionDto {
    pub(super) fn into_domain(self) -> Result<AuthSession, String> {
        let user_id = UserId::new(&self.user.id)
            .map_err(|error| format!("invalid user id {:?}: {error}", self.user.id))?;
        Ok(AuthSession {
            user_id,
            access_token: AccessToken::new(self.access_token),
        })
    }
}

/// Sign-up response.
///
/// With confirmations disabled the service returns a full session; otherwise
/// it returns the bare user object.
#[derive(Debug, Deserialize)]
pub(super) struct SignUpResponseDto {
    pub access_token: Option<String>,
    pub user: Option<AuthUserDto>,
    pub id: Option<String>,
}

impl SignUpResponseDto {
    pub(super) fn into_domain(self) -> Result<SignUpResult, String> {
        let raw_id = self
            .user
            .map(|user| user.id)
            .or(self.id);
        let user_id = raw_id
            .as_deref()
            .map(UserId::new)
            .transpose()
            .map_err(|error| format!("invalid user id: {error}"))?;
        let session = match (self.access_token, user_id.clone()) {
            (Some(token), Some(user_id)) => Some(AuthSession {
                user_id,
                access_token: AccessToken::new(token),
            }),
            _ => None,
        };
        Ok(SignUpResult { user_id, session })
    }
}

/// Error body shapes used by the auth service across versions.
#[derive(Debug, Default, Deserialize)]
pub(super) struct GotrueErrorDto {
    pub msg: Option<String>,
    pub message: Option<String>,
    pub error_description: Option<String>,
    pub error: Option<String>,
}

impl GotrueErrorDto {
    /// Most specific human-readable message present in the body.
    pub(super) fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
    }
}

/// Identity columns written to `profiles`.
#[derive(Debug, Serialize)]
pub(super) struct ProfileIdentityRowDto<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a ProfileIdentity> for ProfileIdentityRowDto<'a> {
    fn from(identity: &'a ProfileIdentity) -> Self {
        Self {
            id: identity.id.as_ref(),
            username: identity.username.as_ref(),
            email: identity.email.as_ref(),
        }
    }
}

/// Duration columns of a `profiles` row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct DurationColumnsDto {
    pub time_easy_ms: Option<u64>,
    pub time_medium_ms: Option<u64>,
    pub time_hard_ms: Option<u64>,
}

impl From<DurationColumnsDto> for TierDurations {
    fn from(row: DurationColumnsDto) -> Self {
        Self {
            easy_ms: row.time_easy_ms,
            medium_ms: row.time_medium_ms,
            hard_ms: row.time_hard_ms,
        }
    }
}

impl From<&TierDurations> for DurationColumnsDto {
    fn from(durations: &TierDurations) -> Self {
        Self {
            time_easy_ms: durations.easy_ms,
            time_medium_ms: durations.medium_ms,
            time_hard_ms: durations.hard_ms,
        }
    }
}

/// Upsert body for the duration columns.
#[derive(Debug, Serialize)]
pub(super) struct DurationsUpsertDto<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub durations: DurationColumnsDto,
}
