//! Driven port for the code-grading language model.
//!
//! The domain builds the prompt and parses the reply; adapters only move the
//! prompt to the model and hand back the raw reply text.

use async_trait::async_trait;

use crate::domain::VerificationPrompt;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the verification model.
    pub enum VerificationModelError {
        /// Endpoint or key is missing.
        Unconfigured { message: String } =>
            "{message}",
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "verification model transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "verification model timeout: {message}",
        /// The endpoint answered with a non-success status.
        Upstream { status: u16 } =>
            "Codestral API failed with status {status}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "verification model response decode failed: {message}",
    }
}

/// Port for sending a grading prompt to the model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationModel: Send + Sync {
    /// Send `prompt` and return the first reply, if the model produced one.
    async fn complete(
        &self,
        prompt: &VerificationPrompt,
    ) -> Result<Option<String>, VerificationModelError>;
}

/// Model used when no endpoint is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredVerificationModel;

/// Message reported by [`UnconfiguredVerificationModel`].
pub const MISSING_MODEL_CONFIG: &str =
    "CODERUSH_CODESTRAL_API_URL or CODERUSH_CODESTRAL_API_KEY is not set";

#[async_trait]
impl VerificationModel for UnconfiguredVerificationModel {
    async fn complete(
        &self,
        _prompt: &VerificationPrompt,
    ) -> Result<Option<String>, VerificationModelError> {
        Err(VerificationModelError::unconfigured(MISSING_MODEL_CONFIG))
    }
}

/// Fixture model that always returns the same reply.
#[derive(Debug, Clone, Default)]
pub struct FixtureVerificationModel {
    reply: Option<String>,
}

impl FixtureVerificationModel {
    /// Model answering `reply` to every prompt.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// Model that returns no choices.
    pub const fn silent() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl VerificationModel for FixtureVerificationModel {
    async fn complete(
        &self,
        _prompt: &VerificationPrompt,
    ) -> Result<Option<String>, VerificationModelError> {
        Ok(self.reply.clone())
    }
}
