//! Reqwest-backed adapter for the hosted auth and database service.
//!
//! One client serves three ports: password auth through the GoTrue endpoints
//! and profile/leaderboard access through the PostgREST endpoints. The
//! adapter owns transport details only: URLs, headers, status mapping and
//! JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    DurationColumnsDto, DurationsUpsertDto, GotrueErrorDto, PasswordGrantDto,
    ProfileIdentityRowDto, SessionDto, SignUpMetadataDto, SignUpRequestDto, SignUpResponseDto,
};
use crate::domain::ports::{
    AuthGateway, AuthGatewayError, LeaderboardSource, LeaderboardSourceError, ProfileIdentity,
    ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{
    AccessToken, AuthSession, Credentials, Email, LeaderboardRow, SignUpResult, TierDurations,
    UserId, Username,
};

const APIKEY_HEADER: HeaderName = HeaderName::from_static("apikey");
const PREFER_HEADER: HeaderName = HeaderName::from_static("prefer");
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";
const DURATION_COLUMNS: &str = "time_easy_ms,time_medium_ms,time_hard_ms";
const LEADERBOARD_COLUMNS: &str =
    "id,username,email,time_easy_ms,time_medium_ms,time_hard_ms,total_time_ms";

/// Errors raised while constructing [`SupabaseHttpBackend`].
#[derive(Debug, thiserror::Error)]
pub enum SupabaseBuildError {
    /// The project URL could not be extended with an endpoint path.
    #[error("invalid hosted backend url: {0}")]
    Url(#[from] url::ParseError),
    /// The anon key contains bytes not allowed in a header.
    #[error("invalid hosted backend anon key: {0}")]
    Key(#[from] InvalidHeaderValue),
    /// The HTTP client could not be built.
    #[error("failed to build hosted backend client: {0}")]
    Client(#[from] reqwest::Error),
}

struct Endpoints {
    token: Url,
    signup: Url,
    logout: Url,
    profiles: Url,
    leaderboard: Url,
}

impl Endpoints {
    fn new(project_url: &Url) -> Result<Self, url::ParseError> {
        let mut base = project_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut token = base.join("auth/v1/token")?;
        token.query_pairs_mut().append_pair("grant_type", "password");
        Ok(Self {
            token,
            signup: base.join("auth/v1/signup")?,
            logout: base.join("auth/v1/logout")?,
            profiles: base.join("rest/v1/profiles")?,
            leaderboard: base.join("rest/v1/public_leaderboard")?,
        })
    }
}

/// Adapter implementing [`AuthGateway`], [`ProfileRepository`] and
/// [`LeaderboardSource`] against one hosted project.
pub struct SupabaseHttpBackend {
    client: Client,
    endpoints: Endpoints,
    anon_key: Zeroizing<String>,
}

impl SupabaseHttpBackend {
    /// Build an adapter for `project_url` using the project's anon key.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseBuildError`] when the URL cannot be extended, the key
    /// is not a valid header value, or the client cannot be constructed.
    pub fn new(
        project_url: &Url,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SupabaseBuildError> {
        let anon_key = Zeroizing::new(anon_key.into());
        let mut apikey = HeaderValue::from_str(&anon_key)?;
        apikey.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(APIKEY_HEADER, apikey);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(project_url)?,
            anon_key,
        })
    }

    fn with_bearer(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {token}"))
    }

    fn anon(&self, request: RequestBuilder) -> RequestBuilder {
        self.with_bearer(request, &self.anon_key)
    }

    fn leaderboard_request(&self) -> RequestBuilder {
        self.anon(
            self.client
                .get(self.endpoints.leaderboard.clone())
                .query(&[("select", LEADERBOARD_COLUMNS)]),
        )
    }
}

/// Transport-level failure shared by every endpoint before it is mapped to a
/// port error.
#[derive(Debug)]
enum HttpFailure {
    Timeout(String),
    Transport(String),
    Status { status: StatusCode, body: Vec<u8> },
}

impl HttpFailure {
    fn describe(&self) -> String {
        match self {
            Self::Timeout(message) | Self::Transport(message) => message.clone(),
            Self::Status { status, body } => {
                let preview = body_preview(body);
                if preview.is_empty() {
                    format!("status {}", status.as_u16())
                } else {
                    format!("status {}: {preview}", status.as_u16())
                }
            }
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Timeout(error.to_string())
    } else {
        HttpFailure::Transport(error.to_string())
    }
}

async fn send(request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if status.is_success() {
        Ok(body.to_vec())
    } else {
        Err(HttpFailure::Status {
            status,
            body: body.to_vec(),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|error| format!("invalid JSON payload: {error}"))
}

fn gotrue_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<GotrueErrorDto>(body)
        .ok()
        .and_then(GotrueErrorDto::into_message)
}

fn map_sign_in_failure(failure: HttpFailure) -> AuthGatewayError {
    match failure {
        HttpFailure::Status { status, .. }
            if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED =>
        {
            AuthGatewayError::invalid_credentials()
        }
        other => map_auth_failure(other),
    }
}

fn map_auth_failure(failure: HttpFailure) -> AuthGatewayError {
    match failure {
        HttpFailure::Status { status, ref body } if status.is_client_error() => {
            let message = gotrue_message(body).unwrap_or_else(|| failure.describe());
            AuthGatewayError::rejected(message)
        }
        other => AuthGatewayError::unavailable(other.describe()),
    }
}

fn map_profile_failure(failure: HttpFailure) -> ProfileRepositoryError {
    match failure {
        HttpFailure::Status { status, .. } if status == StatusCode::CONFLICT => {
            ProfileRepositoryError::conflict(failure.describe())
        }
        HttpFailure::Status { status, .. } if status.is_client_error() => {
            ProfileRepositoryError::query(failure.describe())
        }
        other => ProfileRepositoryError::connection(other.describe()),
    }
}

fn map_leaderboard_failure(failure: HttpFailure) -> LeaderboardSourceError {
    match failure {
        HttpFailure::Status { status, .. } if status.is_client_error() => {
            LeaderboardSourceError::query(failure.describe())
        }
        other => LeaderboardSourceError::connection(other.describe()),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl AuthGateway for SupabaseHttpBackend {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, AuthGatewayError> {
        let request = self.client.post(self.endpoints.token.clone()).json(&PasswordGrantDto {
            email: email.as_ref(),
            password,
        });
        let body = send(request).await.map_err(map_sign_in_failure)?;
        decode::<SessionDto>(&body)
            .and_then(SessionDto::into_domain)
            .map_err(AuthGatewayError::decode)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthGatewayError> {
        let request = self.client.post(self.endpoints.signup.clone()).json(&SignUpRequestDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
            data: SignUpMetadataDto {
                username: credentials.username().as_ref(),
            },
        });
        let body = send(request).await.map_err(map_auth_failure)?;
        let result = decode::<SignUpResponseDto>(&body)
            .and_then(SignUpResponseDto::into_domain)
            .map_err(AuthGatewayError::decode)?;
        debug!(
            has_session = result.session.is_some(),
            "hosted sign-up completed"
        );
        Ok(result)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError> {
        let request = self.with_bearer(
            self.client.post(self.endpoints.logout.clone()),
            token.expose(),
        );
        send(request).await.map_err(map_auth_failure)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for SupabaseHttpBackend {
    async fn username_taken(&self, username: &Username) -> Result<bool, ProfileRepositoryError> {
        let filter = format!("eq.{}", username.as_ref());
        let request = self.anon(self.client.get(self.endpoints.profiles.clone()).query(&[
            ("select", "id"),
            ("username", filter.as_str()),
            ("limit", "1"),
        ]));
        let body = send(request).await.map_err(map_profile_failure)?;
        let rows: Vec<serde_json::Value> =
            decode(&body).map_err(ProfileRepositoryError::query)?;
        Ok(!rows.is_empty())
    }

    async fn upsert_identity(
        &self,
        identity: &ProfileIdentity,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        let request = self.with_bearer(
            self.client
                .post(self.endpoints.profiles.clone())
                .header(PREFER_HEADER, MERGE_DUPLICATES)
                .json(&ProfileIdentityRowDto::from(identity)),
            token.expose(),
        );
        send(request).await.map_err(map_profile_failure)?;
        Ok(())
    }

    async fn find_durations(
        &self,
        user_id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<TierDurations>, ProfileRepositoryError> {
        let filter = format!("eq.{user_id}");
        let request = self.with_bearer(
            self.client
                .get(self.endpoints.profiles.clone())
                .query(&[("select", DURATION_COLUMNS), ("id", filter.as_str())]),
            token.expose(),
        );
        let body = send(request).await.map_err(map_profile_failure)?;
        let rows: Vec<DurationColumnsDto> =
            decode(&body).map_err(ProfileRepositoryError::query)?;
        Ok(rows.into_iter().next().map(TierDurations::from))
    }

    async fn upsert_durations(
        &self,
        user_id: &UserId,
        durations: &TierDurations,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        let request = self.with_bearer(
            self.client
                .post(self.endpoints.profiles.clone())
                .header(PREFER_HEADER, MERGE_DUPLICATES)
                .json(&DurationsUpsertDto {
                    id: user_id.as_ref(),
                    durations: DurationColumnsDto::from(durations),
                }),
            token.expose(),
        );
        send(request).await.map_err(map_profile_failure)?;
        Ok(())
    }
}

#[async_trait]
impl LeaderboardSource for SupabaseHttpBackend {
    async fn fetch_rows(&self) -> Result<Vec<LeaderboardRow>, LeaderboardSourceError> {
        let body = send(self.leaderboard_request())
            .await
            .map_err(map_leaderboard_failure)?;
        decode(&body).map_err(LeaderboardSourceError::query)
    }
}
