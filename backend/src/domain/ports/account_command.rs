//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to sign players in, up and out without
//! knowing which identity provider backs the deployment.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthenticatedUser, Credentials, Error, SignUpOutcome};

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Sign in and record the player's profile identity.
    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser, Error>;

    /// Register a new player and sign them in when possible.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, Error>;

    /// Revoke the session behind `token`; failures are not reported.
    async fn logout(&self, token: &AccessToken);
}
