//! Progress domain service.
//!
//! Reads and writes the per-tier solve durations on the player's profile.
//! Recording a solve keeps the durations of the other tiers intact.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    ProfileRepository, ProfileRepositoryError, ProgressCommand, ProgressQuery,
};
use crate::domain::{AccessToken, BACKEND_UNCONFIGURED, Error, Tier, TierDurations, UserId};

/// Progress service implementing [`ProgressCommand`] and [`ProgressQuery`].
#[derive(Clone)]
pub struct ProgressService<P> {
    profiles: Arc<P>,
}

impl<P> ProgressService<P> {
    /// Create a new service over the profile repository.
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }
}

impl<P> ProgressService<P>
where
    P: ProfileRepository,
{
    fn map_profile_error(error: ProfileRepositoryError) -> Error {
        warn!(error_kind = error.kind(), %error, "profile durations call failed");
        match error {
            ProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            ProfileRepositoryError::Query { message } => {
                Error::internal(format!("profile repository error: {message}"))
            }
            ProfileRepositoryError::Conflict { message } => Error::conflict(message),
            ProfileRepositoryError::Unconfigured => {
                Error::service_unavailable(BACKEND_UNCONFIGURED)
            }
        }
    }

    async fn load(&self, user_id: &UserId, token: &AccessToken) -> Result<TierDurations, Error> {
        self.profiles
            .find_durations(user_id, token)
            .await
            .map(Option::unwrap_or_default)
            .map_err(Self::map_profile_error)
    }
}

#[async_trait]
impl<P> ProgressCommand for ProgressService<P>
where
    P: ProfileRepository,
{
    async fn record_solve(
        &self,
        user_id: &UserId,
        token: &AccessToken,
        tier: Tier,
        duration_ms: u64,
    ) -> Result<TierDurations, Error> {
        let durations = self
            .load(user_id, token)
            .await?
            .with_duration(tier, duration_ms);
        self.profiles
            .upsert_durations(user_id, &durations, token)
            .await
            .map_err(Self::map_profile_error)?;
        debug!(%user_id, %tier, duration_ms, "recorded solve");
        Ok(durations)
    }
}

#[async_trait]
impl<P> ProgressQuery for ProgressService<P>
where
    P: ProfileRepository,
{
    async fn durations(
        &self,
        user_id: &UserId,
        token: &AccessToken,
    ) -> Result<TierDurations, Error> {
        self.load(user_id, token).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockProfileRepository;
    use rstest::rstest;

    fn make_service(repo: MockProfileRepository) -> ProgressService<MockProfileRepository> {
        ProgressService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn record_solve_preserves_other_tiers() {
        let user_id = UserId::random();
        let existing = TierDurations::default().with_duration(Tier::Easy, 1_000);
        let mut repo = MockProfileRepository::new();
        repo.expect_find_durations()
            .times(1)
            .return_once(move |_, _| Ok(Some(existing)));
        repo.expect_upsert_durations()
            .withf(|_, durations, _| {
                durations.easy_ms == Some(1_000) && durations.medium_ms == Some(2_500)
            })
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let durations = make_service(repo)
            .record_solve(&user_id, &AccessToken::new("tok"), Tier::Medium, 2_500)
            .await
            .expect("record succeeds");

        assert_eq!(durations.easy_ms, Some(1_000));
        assert_eq!(durations.medium_ms, Some(2_500));
        assert_eq!(durations.hard_ms, None);
    }

    #[tokio::test]
    async fn record_solve_overwrites_same_tier() {
        let existing = TierDurations::default().with_duration(Tier::Easy, 9_000);
        let mut repo = MockProfileRepository::new();
        repo.expect_find_durations()
            .return_once(move |_, _| Ok(Some(existing)));
        repo.expect_upsert_durations().return_once(|_, _, _| Ok(()));

        let durations = make_service(repo)
            .record_solve(&UserId::random(), &AccessToken::new("tok"), Tier::Easy, 4_000)
            .await
            .expect("record succeeds");

        assert_eq!(durations.easy_ms, Some(4_000));
    }

    #[tokio::test]
    async fn durations_default_to_empty_for_missing_profile() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_durations().return_once(|_, _| Ok(None));

        let durations = make_service(repo)
            .durations(&UserId::random(), &AccessToken::new("tok"))
            .await
            .expect("query succeeds");

        assert_eq!(durations, TierDurations::default());
    }

    #[rstest]
    #[case(ProfileRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(ProfileRepositoryError::query("bad column"), ErrorCode::InternalError)]
    #[case(ProfileRepositoryError::conflict("dupe"), ErrorCode::Conflict)]
    #[case(ProfileRepositoryError::unconfigured(), ErrorCode::ServiceUnavailable)]
    #[tokio::test]
    async fn repository_failures_map_to_domain_errors(
        #[case] failure: ProfileRepositoryError,
        #[case] code: ErrorCode,
    ) {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_durations()
            .return_once(move |_, _| Err(failure));
        repo.expect_upsert_durations().never();

        let error = make_service(repo)
            .record_solve(&UserId::random(), &AccessToken::new("tok"), Tier::Hard, 1)
            .await
            .expect_err("record fails");

        assert_eq!(error.code(), code);
    }
}
