//! Driving port for code verification.

use async_trait::async_trait;

use crate::domain::{Error, Verdict, VerificationRequest};

/// Use-case port judging a code snapshot against a problem statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeVerifier: Send + Sync {
    /// Ask the model for a verdict.
    async fn verify(&self, request: &VerificationRequest) -> Result<Verdict, Error>;
}
