//! Hosted backend used by release builds that were started without Supabase
//! settings. Every call fails with the ports' `Unconfigured` error so the
//! services answer 503 instead of silently keeping accounts in memory.

use async_trait::async_trait;

use crate::domain::ports::{
    AuthGateway, AuthGatewayError, LeaderboardSource, LeaderboardSourceError, ProfileIdentity,
    ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{
    AccessToken, AuthSession, Credentials, Email, LeaderboardRow, SignUpResult, TierDurations,
    UserId, Username,
};

/// Hosted backend with no connection details.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredHostedBackend;

#[async_trait]
impl AuthGateway for UnconfiguredHostedBackend {
    async fn sign_in_with_password(
        &self,
        _email: &Email,
        _password: &str,
    ) -> Result<AuthSession, AuthGatewayError> {
        Err(AuthGatewayError::unconfigured())
    }

    async fn sign_up(&self, _credentials: &Credentials) -> Result<SignUpResult, AuthGatewayError> {
        Err(AuthGatewayError::unconfigured())
    }

    async fn sign_out(&self, _token: &AccessToken) -> Result<(), AuthGatewayError> {
        Err(AuthGatewayError::unconfigured())
    }
}

#[async_trait]
impl ProfileRepository for UnconfiguredHostedBackend {
    async fn username_taken(&self, _username: &Username) -> Result<bool, ProfileRepositoryError> {
        Err(ProfileRepositoryError::unconfigured())
    }

    async fn upsert_identity(
        &self,
        _identity: &ProfileIdentity,
        _token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        Err(ProfileRepositoryError::unconfigured())
    }

    async fn find_durations(
        &self,
        _user_id: &UserId,
        _token: &AccessToken,
    ) -> Result<Option<TierDurations>, ProfileRepositoryError> {
        Err(ProfileRepositoryError::unconfigured())
    }

    async fn upsert_durations(
        &self,
        _user_id: &UserId,
        _durations: &TierDurations,
        _token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        Err(ProfileRepositoryError::unconfigured())
    }
}

#[async_trait]
impl LeaderboardSource for UnconfiguredHostedBackend {
    async fn fetch_rows(&self) -> Result<Vec<LeaderboardRow>, LeaderboardSourceError> {
        Err(LeaderboardSourceError::unconfigured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::ports::{AccountCommand, StandingsQuery};
    use crate::domain::{AccountService, BACKEND_UNCONFIGURED, ErrorCode, StandingsService};

    fn credentials() -> Credentials {
        Credentials::try_from_parts("ada", "ada@example.com", "hunter22").expect("credentials")
    }

    #[tokio::test]
    async fn sign_in_reports_missing_configuration() {
        let backend = Arc::new(UnconfiguredHostedBackend);
        let service = AccountService::new(backend.clone(), backend);

        let error = service.login(&credentials()).await.expect_err("login fails");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), BACKEND_UNCONFIGURED);
    }

    #[tokio::test]
    async fn sign_up_reports_missing_configuration() {
        let backend = Arc::new(UnconfiguredHostedBackend);
        let service = AccountService::new(backend.clone(), backend);

        let error = service.sign_up(&credentials()).await.expect_err("sign-up fails");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), BACKEND_UNCONFIGURED);
    }

    #[tokio::test]
    async fn leaderboard_reports_missing_configuration() {
        let service = StandingsService::new(Arc::new(UnconfiguredHostedBackend));

        let error = service.standings().await.expect_err("standings fail");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), BACKEND_UNCONFIGURED);
    }
}
