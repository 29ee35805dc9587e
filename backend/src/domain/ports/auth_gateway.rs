//! Driven port for the hosted authentication service.
//!
//! Adapters translate password sign-in, sign-up and sign-out into calls
//! against whichever identity provider backs the deployment.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthSession, Credentials, Email, SignUpResult};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth gateway adapters.
    pub enum AuthGatewayError {
        /// The e-mail/password pair was rejected.
        InvalidCredentials => "invalid email or password",
        /// The service refused the request, e.g. a duplicate account.
        Rejected { message: String } => "auth request rejected: {message}",
        /// The service could not be reached or failed.
        Unavailable { message: String } => "auth service unavailable: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "auth response decode failed: {message}",
        /// No auth service is configured for this deployment.
        Unconfigured => "auth service is not configured",
    }
}

/// Port for password-based authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Sign in with an e-mail address and password.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, AuthGatewayError>;

    /// Create an account, recording the username as user metadata.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthGatewayError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError>;
}
