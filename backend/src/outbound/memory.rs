//! In-process stand-in for the hosted auth and database service.
//!
//! Implements the same three ports as the Supabase adapter so local runs and
//! tests can exercise the full flow without network access. Behaviour
//! mirrors the hosted project: tokens are issued on sign-in, profile writes
//! must use the owner's token, usernames are unique, and the leaderboard
//! reports a total only once all three tiers have a duration.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthGateway, AuthGatewayError, LeaderboardSource, LeaderboardSourceError, ProfileIdentity,
    ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{
    AccessToken, AuthSession, Credentials, Email, LeaderboardRow, SignUpResult, TierDurations,
    UserId, UserProfile, Username,
};

const POISONED: &str = "in-memory backend lock poisoned";

struct Account {
    id: UserId,
    password: Zeroizing<String>,
    confirmed: bool,
}

#[derive(Default)]
struct Store {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, UserId>,
    profiles: HashMap<UserId, UserProfile>,
}

impl Store {
    fn issue_token(&mut self, user_id: &UserId) -> AccessToken {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id.clone());
        AccessToken::new(token)
    }

    fn authorise(
        &self,
        user_id: &UserId,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        match self.tokens.get(token.expose()) {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(ProfileRepositoryError::query(
                "access token does not grant access to this profile",
            )),
        }
    }
}

/// In-memory implementation of the hosted-backend ports.
#[derive(Default)]
pub struct InMemoryHostedBackend {
    store: Mutex<Store>,
    require_confirmation: bool,
}

impl InMemoryHostedBackend {
    /// Backend that signs new accounts in immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that withholds sessions until an account is confirmed.
    #[must_use]
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::default()
        }
    }

    /// Mark the account registered under `email` as confirmed.
    pub fn confirm(&self, email: &Email) -> bool {
        let Ok(mut store) = self.store.lock() else {
            return false;
        };
        store
            .accounts
            .get_mut(email.as_ref())
            .map(|account| account.confirmed = true)
            .is_some()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, String> {
        self.store.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl AuthGateway for InMemoryHostedBackend {
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, AuthGatewayError> {
        let mut store = self.lock().map_err(AuthGatewayError::unavailable)?;
        let user_id = match store.accounts.get(email.as_ref()) {
            Some(account) if account.password.as_str() == password && account.confirmed => {
                account.id.clone()
            }
            _ => return Err(AuthGatewayError::invalid_credentials()),
        };
        let access_token = store.issue_token(&user_id);
        Ok(AuthSession {
            user_id,
            access_token,
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthGatewayError> {
        let mut store = self.lock().map_err(AuthGatewayError::unavailable)?;
        let key = credentials.email().as_ref().to_owned();
        if store.accounts.contains_key(&key) {
            return Err(AuthGatewayError::rejected("User already registered"));
        }
        let user_id = UserId::random();
        let confirmed = !self.require_confirmation;
        store.accounts.insert(
            key,
            Account {
                id: user_id.clone(),
                password: Zeroizing::new(credentials.password().to_owned()),
                confirmed,
            },
        );
        let session = confirmed.then(|| AuthSession {
            user_id: user_id.clone(),
            access_token: store.issue_token(&user_id),
        });
        Ok(SignUpResult {
            user_id: Some(user_id),
            session,
        })
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError> {
        let mut store = self.lock().map_err(AuthGatewayError::unavailable)?;
        store.tokens.remove(token.expose());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryHostedBackend {
    async fn username_taken(&self, username: &Username) -> Result<bool, ProfileRepositoryError> {
        let store = self.lock().map_err(ProfileRepositoryError::connection)?;
        Ok(store
            .profiles
            .values()
            .any(|profile| profile.username.as_ref() == Some(username)))
    }

    async fn upsert_identity(
        &self,
        identity: &ProfileIdentity,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        let mut store = self.lock().map_err(ProfileRepositoryError::connection)?;
        store.authorise(&identity.id, token)?;
        let clash = store.profiles.iter().any(|(id, profile)| {
            id != &identity.id && profile.username.as_ref() == Some(&identity.username)
        });
        if clash {
            return Err(ProfileRepositoryError::conflict(format!(
                "duplicate key value violates unique constraint on username {:?}",
                identity.username.as_ref()
            )));
        }
        let profile = store
            .profiles
            .entry(identity.id.clone())
            .or_insert_with(|| UserProfile::new(identity.id.clone()));
        profile.username = Some(identity.username.clone());
        profile.email = Some(identity.email.clone());
        Ok(())
    }

    async fn find_durations(
        &self,
        user_id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<TierDurations>, ProfileRepositoryError> {
        let store = self.lock().map_err(ProfileRepositoryError::connection)?;
        store.authorise(user_id, token)?;
        Ok(store.profiles.get(user_id).map(|profile| profile.durations))
    }

    async fn upsert_durations(
        &self,
        user_id: &UserId,
        durations: &TierDurations,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError> {
        let mut store = self.lock().map_err(ProfileRepositoryError::connection)?;
        store.authorise(user_id, token)?;
        store
            .profiles
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()))
            .durations = *durations;
        Ok(())
    }
}

#[async_trait]
impl LeaderboardSource for InMemoryHostedBackend {
    async fn fetch_rows(&self) -> Result<Vec<LeaderboardRow>, LeaderboardSourceError> {
        let store = self.lock().map_err(LeaderboardSourceError::connection)?;
        Ok(store
            .profiles
            .values()
            .map(UserProfile::leaderboard_row)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Tier;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ada() -> Credentials {
        Credentials::try_from_parts("ada", "ada@example.com", "pw").expect("credentials")
    }

    async fn signed_in(backend: &InMemoryHostedBackend, creds: &Credentials) -> AuthSession {
        backend
            .sign_up(creds)
            .await
            .expect("sign-up")
            .session
            .expect("session issued")
    }

    #[rstest]
    #[tokio::test]
    async fn sign_in_requires_matching_password(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        signed_in(&backend, &ada).await;

        assert!(backend.sign_in_with_password(ada.email(), "pw").await.is_ok());
        assert_eq!(
            backend
                .sign_in_with_password(ada.email(), "nope")
                .await
                .expect_err("wrong password"),
            AuthGatewayError::invalid_credentials()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_sign_up_is_rejected(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        signed_in(&backend, &ada).await;
        let error = backend.sign_up(&ada).await.expect_err("duplicate");
        assert_eq!(error, AuthGatewayError::rejected("User already registered"));
    }

    #[rstest]
    #[tokio::test]
    async fn confirmation_withholds_session_until_confirmed(ada: Credentials) {
        let backend = InMemoryHostedBackend::requiring_confirmation();
        let result = backend.sign_up(&ada).await.expect("sign-up");
        assert!(result.user_id.is_some());
        assert!(result.session.is_none());
        assert!(backend.sign_in_with_password(ada.email(), "pw").await.is_err());

        assert!(backend.confirm(ada.email()));
        assert!(backend.sign_in_with_password(ada.email(), "pw").await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn profile_writes_require_owner_token(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        let session = signed_in(&backend, &ada).await;
        let durations = TierDurations::default().with_duration(Tier::Easy, 10);

        let foreign = backend
            .upsert_durations(&UserId::random(), &durations, &session.access_token)
            .await
            .expect_err("foreign profile");
        assert!(matches!(foreign, ProfileRepositoryError::Query { .. }));

        backend
            .upsert_durations(&session.user_id, &durations, &session.access_token)
            .await
            .expect("own profile");
        let stored = backend
            .find_durations(&session.user_id, &session.access_token)
            .await
            .expect("read back");
        assert_eq!(stored, Some(durations));
    }

    #[rstest]
    #[tokio::test]
    async fn usernames_are_unique(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        let first = signed_in(&backend, &ada).await;
        backend
            .upsert_identity(
                &ProfileIdentity {
                    id: first.user_id.clone(),
                    username: ada.username().clone(),
                    email: ada.email().clone(),
                },
                &first.access_token,
            )
            .await
            .expect("first identity");
        assert!(backend.username_taken(ada.username()).await.expect("lookup"));

        let other = Credentials::try_from_parts("ada", "other@example.com", "pw")
            .expect("credentials");
        let second = signed_in(&backend, &other).await;
        let error = backend
            .upsert_identity(
                &ProfileIdentity {
                    id: second.user_id.clone(),
                    username: other.username().clone(),
                    email: other.email().clone(),
                },
                &second.access_token,
            )
            .await
            .expect_err("duplicate username");
        assert!(matches!(error, ProfileRepositoryError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn leaderboard_total_needs_all_tiers(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        let session = signed_in(&backend, &ada).await;
        let partial = TierDurations::default()
            .with_duration(Tier::Easy, 1)
            .with_duration(Tier::Medium, 2);
        backend
            .upsert_durations(&session.user_id, &partial, &session.access_token)
            .await
            .expect("write");
        let rows = backend.fetch_rows().await.expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_time_ms, None);

        let full = partial.with_duration(Tier::Hard, 3);
        backend
            .upsert_durations(&session.user_id, &full, &session.access_token)
            .await
            .expect("write");
        let rows = backend.fetch_rows().await.expect("rows");
        assert_eq!(rows[0].total_time_ms, Some(6));
    }

    #[rstest]
    #[tokio::test]
    async fn sign_out_revokes_token(ada: Credentials) {
        let backend = InMemoryHostedBackend::new();
        let session = signed_in(&backend, &ada).await;
        backend.sign_out(&session.access_token).await.expect("sign out");
        let error = backend
            .find_durations(&session.user_id, &session.access_token)
            .await
            .expect_err("revoked token");
        assert!(matches!(error, ProfileRepositoryError::Query { .. }));
    }
}
