//! Port for player profile persistence.
//!
//! Profiles hold the public username, the sign-in e-mail and one solve
//! duration per tier. Writes are authorised with the player's access token.

use async_trait::async_trait;

use crate::domain::{AccessToken, Email, TierDurations, UserId, Username};

use super::define_port_error;

/// Identity columns written on every sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileIdentity {
    /// Profile id, equal to the auth user id.
    pub id: UserId,
    /// Public handle.
    pub username: Username,
    /// Sign-in address.
    pub email: Email,
}

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository could not be reached.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } =>
            "profile repository conflict: {message}",
        /// No profile store is configured for this deployment.
        Unconfigured => "profile repository is not configured",
    }
}

/// Port for profile storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Whether any profile already uses `username`.
    async fn username_taken(&self, username: &Username) -> Result<bool, ProfileRepositoryError>;

    /// Insert or update the identity columns, leaving durations untouched.
    async fn upsert_identity(
        &self,
        identity: &ProfileIdentity,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError>;

    /// Fetch the recorded durations; `None` when the profile does not exist.
    async fn find_durations(
        &self,
        user_id: &UserId,
        token: &AccessToken,
    ) -> Result<Option<TierDurations>, ProfileRepositoryError>;

    /// Write all three duration columns.
    async fn upsert_durations(
        &self,
        user_id: &UserId,
        durations: &TierDurations,
        token: &AccessToken,
    ) -> Result<(), ProfileRepositoryError>;
}
