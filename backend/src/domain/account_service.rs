//! Account domain service.
//!
//! Signs players in and up through the auth gateway and keeps the profile
//! identity columns in step with every successful sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    AccountCommand, AuthGateway, AuthGatewayError, ProfileIdentity, ProfileRepository,
    ProfileRepositoryError,
};
use crate::domain::{
    AccessToken, AuthSession, AuthenticatedUser, Credentials, Error, SignUpOutcome,
};

/// Message returned for any rejected sign-in.
pub const INVALID_LOGIN: &str = "Invalid email or password";
/// Message returned when the username belongs to another profile.
pub const USERNAME_TAKEN: &str = "Username already taken";
/// Message returned when a new account cannot sign in until confirmed.
pub const EMAIL_CONFIRMATION_REQUIRED: &str =
    "Project requires email confirmation. Disable confirmations to allow instant sign-in.";
/// Message returned when no hosted backend is configured.
pub const BACKEND_UNCONFIGURED: &str = "hosted backend is not configured";

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<A, P> {
    auth: Arc<A>,
    profiles: Arc<P>,
}

impl<A, P> AccountService<A, P> {
    /// Create a new service over the given ports.
    pub fn new(auth: Arc<A>, profiles: Arc<P>) -> Self {
        Self { auth, profiles }
    }
}

impl<A, P> AccountService<A, P>
where
    A: AuthGateway,
    P: ProfileRepository,
{
    fn map_sign_in_error(error: AuthGatewayError) -> Error {
        debug!(error_kind = error.kind(), "sign-in refused");
        match error {
            AuthGatewayError::InvalidCredentials | AuthGatewayError::Rejected { .. } => {
                Error::unauthorized(INVALID_LOGIN)
            }
            AuthGatewayError::Unconfigured => Error::service_unavailable(BACKEND_UNCONFIGURED),
            other => Error::service_unavailable(other.to_string()),
        }
    }

    fn map_sign_up_error(error: AuthGatewayError) -> Error {
        debug!(error_kind = error.kind(), "sign-up refused");
        match error {
            AuthGatewayError::Rejected { message } => Error::invalid_request(message),
            AuthGatewayError::InvalidCredentials => Error::unauthorized(INVALID_LOGIN),
            AuthGatewayError::Unconfigured => Error::service_unavailable(BACKEND_UNCONFIGURED),
            other => Error::service_unavailable(other.to_string()),
        }
    }

    fn map_profile_error(error: ProfileRepositoryError) -> Error {
        warn!(error_kind = error.kind(), %error, "profile identity write failed");
        let message = format!("Failed to save profile: {error}");
        match error {
            ProfileRepositoryError::Conflict { .. } => Error::conflict(message),
            ProfileRepositoryError::Unconfigured => {
                Error::service_unavailable(BACKEND_UNCONFIGURED)
            }
            _ => Error::service_unavailable(message),
        }
    }

    async fn save_identity(
        &self,
        credentials: &Credentials,
        session: AuthSession,
    ) -> Result<AuthenticatedUser, Error> {
        let identity = ProfileIdentity {
            id: session.user_id.clone(),
            username: credentials.username().clone(),
            email: credentials.email().clone(),
        };
        self.profiles
            .upsert_identity(&identity, &session.access_token)
            .await
            .map_err(Self::map_profile_error)?;
        Ok(AuthenticatedUser {
            id: session.user_id,
            username: identity.username,
            access_token: session.access_token,
        })
    }
}

#[async_trait]
impl<A, P> AccountCommand for AccountService<A, P>
where
    A: AuthGateway,
    P: ProfileRepository,
{
    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser, Error> {
        let session = self
            .auth
            .sign_in_with_password(credentials.email(), credentials.password())
            .await
            .map_err(Self::map_sign_in_error)?;
        debug!(user_id = %session.user_id, "password sign-in succeeded");
        self.save_identity(credentials, session).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, Error> {
        match self.profiles.username_taken(credentials.username()).await {
            Ok(true) => return Err(Error::conflict(USERNAME_TAKEN)),
            Ok(false) => {}
            Err(error) => {
                warn!(%error, "username availability check failed; continuing sign-up");
            }
        }

        let created = self
            .auth
            .sign_up(credentials)
            .await
            .map_err(Self::map_sign_up_error)?;

        let session = match created.session {
            Some(session) => session,
            None => match self
                .auth
                .sign_in_with_password(credentials.email(), credentials.password())
                .await
            {
                Ok(session) => session,
                Err(error) => {
                    warn!(%error, "sign-in after sign-up failed; confirmation required");
                    return Ok(SignUpOutcome::VerificationRequired {
                        user_id: created.user_id,
                    });
                }
            },
        };

        self.save_identity(credentials, session)
            .await
            .map(SignUpOutcome::SignedIn)
    }

    async fn logout(&self, token: &AccessToken) {
        if let Err(error) = self.auth.sign_out(token).await {
            warn!(%error, "sign-out failed; clearing local session anyway");
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
