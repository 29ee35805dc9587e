//! Code verification service.
//!
//! Renders the grading prompt, forwards it to the verification model and
//! turns the raw reply into a [`Verdict`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{CodeVerifier, VerificationModel};
use crate::domain::{Error, Verdict, VerificationPrompt, VerificationRequest};

/// Verification service implementing [`CodeVerifier`].
#[derive(Clone)]
pub struct VerificationService<M> {
    model: Arc<M>,
}

impl<M> VerificationService<M> {
    /// Create a new service over the model port.
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M> CodeVerifier for VerificationService<M>
where
    M: VerificationModel,
{
    async fn verify(&self, request: &VerificationRequest) -> Result<Verdict, Error> {
        let prompt = VerificationPrompt::build(request);
        let reply = self.model.complete(&prompt).await.map_err(|error| {
            warn!(error_kind = error.kind(), %error, "verification model call failed");
            Error::service_unavailable(error.to_string())
        })?;
        let verdict = Verdict::from_model_reply(reply.as_deref());
        debug!(language = %request.language, ?verdict, "verification finished");
        Ok(verdict)
    }
}
